//! Guards that turn plain values into outcomes.
//!
//! ```rust
//! use upshot::Outcome;
//!
//! let port: Outcome<u16> = Outcome::from_option(Some(8080), "port is not set");
//! assert_eq!(port, Outcome::success(8080));
//!
//! let retries: Outcome<u32> = Outcome::non_default(0, "retries must be set");
//! assert_eq!(retries.error_message(), "retries must be set");
//! ```

use super::Outcome;
use crate::failure::Failure;

impl<T> Outcome<T, Failure> {
    /// Success with the contained value, or a failure with `message` on `None`.
    #[track_caller]
    pub fn from_option(value: Option<T>, message: impl Into<String>) -> Self {
        match value {
            Some(value) => Outcome::Success(value),
            None => Outcome::failure(message),
        }
    }

    /// Success unless `value` equals its type's default.
    #[track_caller]
    pub fn non_default(value: T, message: impl Into<String>) -> Self
    where
        T: Default + PartialEq,
    {
        if value == T::default() {
            Outcome::failure(message)
        } else {
            Outcome::Success(value)
        }
    }

    /// Run `f` on the contained value, or fail with `message` on `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upshot::Outcome;
    ///
    /// let name: Option<&str> = None;
    /// let greeting = Outcome::when_some(name, "no name given", |n| {
    ///     Outcome::success(format!("hello {}", n))
    /// });
    /// assert_eq!(greeting.error_message(), "no name given");
    /// ```
    #[track_caller]
    pub fn when_some<U, G>(value: Option<T>, message: impl Into<String>, f: G) -> Outcome<U>
    where
        G: FnOnce(T) -> Outcome<U>,
    {
        Outcome::from_option(value, message).bind(f)
    }

    /// Run `f` on `value` unless it equals its type's default.
    #[track_caller]
    pub fn when_not_default<U, G>(value: T, message: impl Into<String>, f: G) -> Outcome<U>
    where
        T: Default + PartialEq,
        G: FnOnce(T) -> Outcome<U>,
    {
        Outcome::non_default(value, message).bind(f)
    }

    /// Turn a success into a failure when its value does not satisfy `predicate`.
    ///
    /// Failures pass through untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upshot::Outcome;
    ///
    /// let age = Outcome::success(17).ensure(|a| *a >= 18, "must be an adult");
    /// assert_eq!(age.error_message(), "must be an adult");
    /// ```
    #[track_caller]
    pub fn ensure<P>(self, predicate: P, message: impl Into<String>) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Outcome::Success(value) => {
                if predicate(&value) {
                    Outcome::Success(value)
                } else {
                    Outcome::failure(message)
                }
            }
            failure => failure,
        }
    }
}
