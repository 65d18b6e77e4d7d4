//! Scoped resources: acquire, use, always release.
//!
//! [`using`] and friends run a body against a freshly acquired resource and
//! release the resource exactly once afterwards, whichever way the body
//! exits:
//!
//! - normal return (including a failed [`Outcome`])
//! - an `Err(Fault)` returned by the body
//! - a panic, in which case the resource is released and the panic resumes
//!
//! Release always happens before the combinator returns, so a resource is
//! gone by the time its outcome reaches the next [`bind`](Outcome::bind).
//!
//! # Example
//!
//! ```rust
//! use upshot::{using, Outcome, Release};
//!
//! struct Connection {
//!     open: bool,
//! }
//!
//! impl Release for Connection {
//!     fn release(self) {
//!         println!("closing connection (open: {})", self.open);
//!     }
//! }
//!
//! let rows: Outcome<usize> = using(
//!     || Connection { open: true },
//!     |conn| {
//!         if conn.open {
//!             Outcome::success(3)
//!         } else {
//!             Outcome::failure("connection closed")
//!         }
//!     },
//! );
//! assert_eq!(rows, Outcome::success(3));
//! ```

use std::fmt;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use crate::outcome::Outcome;

/// A value that owns something needing deterministic cleanup.
///
/// `release` consumes the value, so it can run at most once.
pub trait Release {
    /// Give the underlying resource back.
    fn release(self);
}

/// Pairs a value with a release closure.
///
/// Lets any value take part in [`using`] without a [`Release`] impl of its
/// own.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use upshot::{using, Releasing};
///
/// let closed = Cell::new(false);
/// let len = using(
///     || Releasing::new(vec![1, 2, 3], |_| closed.set(true)),
///     |v| v.len(),
/// );
/// assert_eq!(len, 3);
/// assert!(closed.get());
/// ```
pub struct Releasing<R, G>
where
    G: FnOnce(R),
{
    resource: R,
    release: G,
}

impl<R, G> Releasing<R, G>
where
    G: FnOnce(R),
{
    /// Wrap `resource`, releasing it with `release`.
    pub fn new(resource: R, release: G) -> Self {
        Releasing { resource, release }
    }
}

impl<R, G> Release for Releasing<R, G>
where
    G: FnOnce(R),
{
    fn release(self) {
        (self.release)(self.resource)
    }
}

impl<R, G> Deref for Releasing<R, G>
where
    G: FnOnce(R),
{
    type Target = R;

    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<R, G> DerefMut for Releasing<R, G>
where
    G: FnOnce(R),
{
    fn deref_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

impl<R: fmt::Debug, G> fmt::Debug for Releasing<R, G>
where
    G: FnOnce(R),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Releasing")
            .field("resource", &self.resource)
            .field("release", &"<function>")
            .finish()
    }
}

fn release<R: Release>(resource: R) {
    resource.release();
    #[cfg(feature = "tracing")]
    tracing::trace!(resource = std::any::type_name::<R>(), "released scoped resource");
}

/// Acquire a resource with `create`, run `body` on it, then release it.
///
/// The body's return value is passed through untouched.
///
/// # Panics
///
/// A panic in `body` is resumed after the resource has been released.
pub fn using<R, T, C, B>(create: C, body: B) -> T
where
    R: Release,
    C: FnOnce() -> R,
    B: FnOnce(&mut R) -> T,
{
    let mut resource = create();
    let result = panic::catch_unwind(AssertUnwindSafe(|| body(&mut resource)));
    release(resource);
    match result {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Like [`using`], for a `create` step that can itself fail.
///
/// A failed `create` short-circuits: nothing was acquired, so nothing is
/// released and `body` never runs.
///
/// # Example
///
/// ```rust
/// use upshot::{using_outcome, Outcome, Releasing};
///
/// let missing: Outcome<usize> = using_outcome(
///     || Outcome::<Releasing<String, fn(String)>>::failure("no such file"),
///     |text| Outcome::success(text.len()),
/// );
/// assert_eq!(missing.error_message(), "no such file");
/// ```
pub fn using_outcome<R, T, F, C, B>(create: C, body: B) -> Outcome<T, F>
where
    R: Release,
    C: FnOnce() -> Outcome<R, F>,
    B: FnOnce(&mut R) -> Outcome<T, F>,
{
    create().using(body)
}

impl<R: Release, F> Outcome<R, F> {
    /// Run `body` on the resource held by a success, then release it.
    ///
    /// A failure is passed through and nothing is released.
    pub fn using<T, B>(self, body: B) -> Outcome<T, F>
    where
        B: FnOnce(&mut R) -> Outcome<T, F>,
    {
        match self {
            Outcome::Success(resource) => using(move || resource, body),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }
}

/// Asynchronous [`using`]: both steps may suspend.
///
/// The resource is released after the body's future completes (or panics)
/// and before the returned future resolves. Dropping the returned future
/// before the body finishes drops the resource without releasing it.
///
/// # Example
///
/// ```rust
/// use upshot::{using_async, Releasing};
///
/// # tokio_test::block_on(async {
/// let total = using_async(
///     || async { Releasing::new(vec![1, 2, 3], drop as fn(Vec<i32>)) },
///     async |v: &mut Releasing<Vec<i32>, fn(Vec<i32>)>| v.iter().sum::<i32>(),
/// )
/// .await;
/// assert_eq!(total, 6);
/// # });
/// ```
pub async fn using_async<R, T, C, Fut, B>(create: C, body: B) -> T
where
    R: Release,
    C: FnOnce() -> Fut,
    Fut: Future<Output = R>,
    B: AsyncFnOnce(&mut R) -> T,
{
    let mut resource = create().await;
    let result = AssertUnwindSafe(body(&mut resource)).catch_unwind().await;
    release(resource);
    match result {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Asynchronous [`using_outcome`].
pub async fn using_outcome_async<R, T, F, C, Fut, B>(create: C, body: B) -> Outcome<T, F>
where
    R: Release,
    C: FnOnce() -> Fut,
    Fut: Future<Output = Outcome<R, F>>,
    B: AsyncFnOnce(&mut R) -> Outcome<T, F>,
{
    match create().await {
        Outcome::Success(resource) => using_async(move || async move { resource }, body).await,
        Outcome::Failure(failure) => Outcome::Failure(failure),
    }
}
