//! The outcome type: success or failure-with-context.
//!
//! `Outcome<T, F>` is the return type of an operation that can fail in an
//! expected way. It comes in three shapes:
//!
//! - `Outcome<()>` - success or a failure message, no value
//! - `Outcome<T>` - a value or a failure message
//! - [`CodedOutcome<T, C>`] - a value or a failure message plus a
//!   [`FailureCode`]
//!
//! # Invariants
//!
//! A success carries no message and reports the [`FailureCode::NONE`] code.
//! That holds by construction: the `Success` variant has nowhere to put
//! either. A failure always has a non-empty message (and, for the coded
//! shape, a real code); the payload types check that when they are built.
//!
//! # Chaining
//!
//! [`bind`](Outcome::bind) runs the next step only on success. A failure flows
//! through every later `bind` untouched: same message, same code.
//!
//! ```
//! use upshot::Outcome;
//!
//! fn parse(input: &str) -> Outcome<i32> {
//!     match input.parse() {
//!         Ok(n) => Outcome::success(n),
//!         Err(_) => Outcome::failure(format!("not a number: {}", input)),
//!     }
//! }
//!
//! fn halve(n: i32) -> Outcome<i32> {
//!     if n % 2 == 0 {
//!         Outcome::success(n / 2)
//!     } else {
//!         Outcome::failure("odd")
//!     }
//! }
//!
//! assert_eq!(parse("8").bind(halve), Outcome::success(4));
//! assert_eq!(parse("x").bind(halve).error_message(), "not a number: x");
//! ```

mod future;
mod validate;


use std::fmt;
use std::hash::{Hash, Hasher};

use crate::failure::{CodedFailure, Failure, FailureCode, FailureKind};
use crate::fault::Fault;
use crate::semigroup::Semigroup;

pub use future::OutcomeFutureExt;

/// The result of an operation that can fail.
///
/// Equality ignores failure messages: two successes are equal when their
/// values are, and two failures are equal when their payloads belong to the
/// same category (always, for [`Failure`]; same code, for [`CodedFailure`]).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome<T = (), F = Failure> {
    /// The operation succeeded.
    Success(T),
    /// The operation failed.
    Failure(F),
}

/// An outcome whose failures carry a code of type `C`.
pub type CodedOutcome<T, C> = Outcome<T, CodedFailure<C>>;

impl<T, F> Outcome<T, F> {
    /// Create a successful outcome.
    #[inline]
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Returns `true` on success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` on failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The value, if this is a success.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Consume the outcome, returning the value if this is a success.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// The failure payload, if this is a failure.
    pub fn as_failure(&self) -> Option<&F> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// Consume the outcome, returning the failure payload if there is one.
    pub fn into_failure(self) -> Option<F> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// Borrow the contents.
    pub fn as_ref(&self) -> Outcome<&T, &F> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Run the next outcome-producing step on the value.
    ///
    /// A failure short-circuits: `f` is not called and the failure payload is
    /// carried over unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upshot::Outcome;
    ///
    /// let next = Outcome::<i32>::success(5).bind(|x| Outcome::success(x + 1));
    /// assert_eq!(next, Outcome::success(6));
    ///
    /// let failed: Outcome<i32> = Outcome::failure("boom");
    /// let next = failed.bind(|x| Outcome::success(x + 1));
    /// assert_eq!(next.error_message(), "boom");
    /// ```
    #[inline]
    pub fn bind<U, G>(self, f: G) -> Outcome<U, F>
    where
        G: FnOnce(T) -> Outcome<U, F>,
    {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Transform the value of a success.
    #[inline]
    pub fn map<U, G>(self, f: G) -> Outcome<U, F>
    where
        G: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Inspect the value of a success without consuming it.
    #[inline]
    pub fn tap<G>(self, f: G) -> Self
    where
        G: FnOnce(&T),
    {
        if let Outcome::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Transform the failure payload.
    #[inline]
    pub fn map_failure<F2, G>(self, f: G) -> Outcome<T, F2>
    where
        G: FnOnce(F) -> F2,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(failure) => Outcome::Failure(f(failure)),
        }
    }

    /// Recover from a failure with another outcome-producing step.
    ///
    /// A success is passed through and `f` is not called.
    #[inline]
    pub fn or_else<F2, G>(self, f: G) -> Outcome<T, F2>
    where
        G: FnOnce(F) -> Outcome<T, F2>,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(failure) => f(failure),
        }
    }

    /// The value, or `default` on failure.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => default,
        }
    }

    /// Combine two independent outcomes.
    ///
    /// Both successes yield a pair. When both fail, the failures are combined
    /// (left first); when only one fails, that failure is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upshot::Outcome;
    ///
    /// let name: Outcome<&str> = Outcome::failure("name is empty");
    /// let age: Outcome<u8> = Outcome::failure("age is missing");
    ///
    /// let both = name.and(age);
    /// assert_eq!(both.error_message(), "name is empty\nage is missing");
    /// ```
    pub fn and<U>(self, other: Outcome<U, F>) -> Outcome<(T, U), F>
    where
        F: Semigroup,
    {
        match (self, other) {
            (Outcome::Success(a), Outcome::Success(b)) => Outcome::Success((a, b)),
            (Outcome::Failure(a), Outcome::Failure(b)) => Outcome::Failure(a.combine(b)),
            (Outcome::Failure(failure), Outcome::Success(_))
            | (Outcome::Success(_), Outcome::Failure(failure)) => Outcome::Failure(failure),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, F> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

impl<T, F: FailureKind> Outcome<T, F> {
    /// The failure message; empty on success.
    pub fn error_message(&self) -> &str {
        match self {
            Outcome::Success(_) => "",
            Outcome::Failure(failure) => failure.message(),
        }
    }

    /// Prefix a failure's message with a line of context.
    ///
    /// Successes are returned untouched.
    pub fn with_context(self, context: &str) -> Self {
        self.map_failure(|failure| failure.with_context(context))
    }
}

impl<T> Outcome<T, Failure> {
    /// Create a failed outcome.
    ///
    /// # Panics
    ///
    /// Panics if `message` is empty. Use [`Failure::try_new`] when the message
    /// comes from data.
    #[track_caller]
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure(Failure::new(message))
    }

    /// Create a failed outcome from a fault's flattened trace.
    pub fn from_fault(fault: &Fault, prefix: &str) -> Self {
        Outcome::Failure(crate::failure::FromFault::from_fault(fault, prefix))
    }

    /// Attach a code to a failure; a success stays a success.
    ///
    /// # Panics
    ///
    /// Panics on failure if `code` is the sentinel.
    #[track_caller]
    pub fn to_coded<C: FailureCode>(self, code: C) -> CodedOutcome<T, C> {
        self.map_failure(|failure| CodedFailure::with_message(code, failure.into_message()))
    }
}

impl Outcome<(), Failure> {
    /// A successful outcome with no value.
    #[inline]
    pub fn unit() -> Self {
        Outcome::Success(())
    }
}

impl<T, C: FailureCode> Outcome<T, CodedFailure<C>> {
    /// Create a failed outcome whose message is the code's symbolic name.
    ///
    /// # Panics
    ///
    /// Panics if `code` is the sentinel.
    #[track_caller]
    pub fn failure_code(code: C) -> Self {
        Outcome::Failure(CodedFailure::new(code))
    }

    /// Create a failed outcome with a code and message.
    ///
    /// # Panics
    ///
    /// Panics if `code` is the sentinel.
    #[track_caller]
    pub fn failure_code_with(code: C, message: impl Into<String>) -> Self {
        Outcome::Failure(CodedFailure::with_message(code, message))
    }

    /// Create a failed outcome from a fault's flattened trace and a code.
    ///
    /// # Panics
    ///
    /// Panics if `code` is the sentinel.
    #[track_caller]
    pub fn from_fault_code(fault: &Fault, code: C, prefix: &str) -> Self {
        Outcome::Failure(CodedFailure::from_fault(fault, code, prefix))
    }

    /// The failure code; [`FailureCode::NONE`] on success.
    pub fn error_code(&self) -> C {
        match self {
            Outcome::Success(_) => C::NONE,
            Outcome::Failure(failure) => failure.code(),
        }
    }

    /// Drop the code, keeping the message.
    pub fn uncoded(self) -> Outcome<T> {
        self.map_failure(CodedFailure::uncoded)
    }
}

impl<T: PartialEq, F: FailureKind> PartialEq for Outcome<T, F> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Outcome::Success(a), Outcome::Success(b)) => a == b,
            (Outcome::Failure(a), Outcome::Failure(b)) => a.same_category(b),
            _ => false,
        }
    }
}

impl<T: Eq, F: FailureKind> Eq for Outcome<T, F> {}

impl<T: Hash, F: FailureKind> Hash for Outcome<T, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Outcome::Success(value) => {
                0u8.hash(state);
                value.hash(state);
            }
            Outcome::Failure(failure) => {
                1u8.hash(state);
                failure.hash_category(state);
            }
        }
    }
}

impl<T: fmt::Display, F: FailureKind> fmt::Display for Outcome<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(value) => write!(f, "{}", value),
            Outcome::Failure(failure) => write!(f, "{}", failure.message()),
        }
    }
}

impl<T, F> From<Result<T, F>> for Outcome<T, F> {
    fn from(result: Result<T, F>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(failure) => Outcome::Failure(failure),
        }
    }
}

impl<T, F> From<Outcome<T, F>> for Result<T, F> {
    fn from(outcome: Outcome<T, F>) -> Self {
        outcome.into_result()
    }
}
