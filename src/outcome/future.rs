//! Chaining across suspension points.
//!
//! [`Outcome::bind_async`] runs a future-returning step on a success. The
//! failure branch hands back an already-completed future, so a short-circuit
//! never suspends.
//!
//! [`OutcomeFutureExt`] does the same for a future that will produce an
//! outcome, which lets async pipelines read top to bottom:
//!
//! ```rust
//! use upshot::{Outcome, OutcomeFutureExt};
//!
//! async fn fetch(id: u32) -> Outcome<String> {
//!     Outcome::success(format!("user-{}", id))
//! }
//!
//! # tokio_test::block_on(async {
//! let name = fetch(7)
//!     .bind(|name| Outcome::success(name.len()))
//!     .map_value(|len| len * 2)
//!     .await;
//! assert_eq!(name, Outcome::success(12));
//! # });
//! ```

use std::future::Future;

use futures::future::{self, Either, Ready};

use super::Outcome;

impl<T, F> Outcome<T, F> {
    /// Run a future-returning step on the value.
    ///
    /// On failure `f` is not called and the returned future is already
    /// complete.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upshot::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let next = Outcome::<i32>::success(5)
    ///     .bind_async(|x| async move { Outcome::success(x + 1) })
    ///     .await;
    /// assert_eq!(next, Outcome::success(6));
    /// # });
    /// ```
    pub fn bind_async<U, G, Fut>(self, f: G) -> Either<Ready<Outcome<U, F>>, Fut>
    where
        G: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U, F>>,
    {
        match self {
            Outcome::Success(value) => Either::Right(f(value)),
            Outcome::Failure(failure) => Either::Left(future::ready(Outcome::Failure(failure))),
        }
    }
}

/// Chaining on futures that resolve to an [`Outcome`].
///
/// Implemented for every `Future<Output = Outcome<T, F>>`.
pub trait OutcomeFutureExt<T, F>: Future<Output = Outcome<T, F>> + Sized {
    /// Await the outcome, then [`bind`](Outcome::bind) a synchronous step.
    fn bind<U, G>(self, f: G) -> impl Future<Output = Outcome<U, F>>
    where
        G: FnOnce(T) -> Outcome<U, F>,
    {
        async move { self.await.bind(f) }
    }

    /// Await the outcome, then bind a future-returning step.
    fn bind_async<U, G, Fut>(self, f: G) -> impl Future<Output = Outcome<U, F>>
    where
        G: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U, F>>,
    {
        async move { self.await.bind_async(f).await }
    }

    /// Await the outcome, then [`map`](Outcome::map) the value.
    fn map_value<U, G>(self, f: G) -> impl Future<Output = Outcome<U, F>>
    where
        G: FnOnce(T) -> U,
    {
        async move { self.await.map(f) }
    }
}

impl<T, F, Fut> OutcomeFutureExt<T, F> for Fut where Fut: Future<Output = Outcome<T, F>> {}
