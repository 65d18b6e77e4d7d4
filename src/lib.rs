//! # Upshot
//!
//! Outcome values for operations that can fail in expected ways.
//!
//! Expected failures are ordinary values: an [`Outcome`] is either a success
//! carrying a value or a failure carrying a non-empty message (and, for a
//! [`CodedOutcome`], a code from a caller-defined enum). Unexpected failures
//! are not outcomes; they travel as a [`Fault`] in the `Err` side of a plain
//! `Result` and `?` carries them up.
//!
//! On top of that the crate offers a handful of combinators:
//!
//! - [`Outcome::bind`] chains dependent steps and stops at the first failure
//! - [`using`] runs a body against a resource and always releases it
//! - [`try_catch`] and [`catch`] turn one category of fault into a failure
//! - [`retry_on_failure`] re-runs an operation under a [`RetryPolicy`]
//!
//! ## Quick Example
//!
//! ```rust
//! use upshot::Outcome;
//!
//! fn parse_port(text: &str) -> Outcome<u16> {
//!     match text.parse::<u16>() {
//!         Ok(port) => Outcome::success(port),
//!         Err(_) => Outcome::failure(format!("'{}' is not a port", text)),
//!     }
//! }
//!
//! fn check_unprivileged(port: u16) -> Outcome<u16> {
//!     if port >= 1024 {
//!         Outcome::success(port)
//!     } else {
//!         Outcome::failure("privileged ports are not allowed")
//!     }
//! }
//!
//! let port = parse_port("8080").bind(check_unprivileged);
//! assert_eq!(port, Outcome::success(8080));
//!
//! let port = parse_port("http").bind(check_unprivileged);
//! assert_eq!(port.error_message(), "'http' is not a port");
//! ```
//!
//! ## Faults and try/catch
//!
//! ```rust
//! use std::num::ParseIntError;
//! use upshot::{try_catch, Fault, Outcome};
//!
//! fn load(text: &str) -> Result<Outcome<i64>, Fault> {
//!     let n: i64 = text.parse()?;
//!     Ok(Outcome::success(n))
//! }
//!
//! let caught = try_catch::<ParseIntError, _, _, _>(|| load("x"), "reading count").unwrap();
//! assert!(caught.error_message().starts_with("reading count\n"));
//! ```
//!
//! ## Feature flags
//!
//! - `async`: asynchronous retry on tokio timers
//! - `jitter`: randomized retry delays
//! - `tracing`: log retries, releases and caught faults through `tracing`
//! - `serde`: serialize outcomes and failures
//! - `proptest`: `Arbitrary` for [`Outcome`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod catch;
pub mod failure;
pub mod fault;
pub mod outcome;
pub mod retry;
pub mod scope;
pub mod semigroup;
pub mod testing;

// Re-exports
pub use catch::{catch, catch_async, catch_value, classify, try_catch, try_catch_async, CatchState};
pub use failure::{
    CodeSet, CodedFailure, Failure, FailureCode, FailureKind, FaultCode, FromFault,
    InvariantViolation,
};
pub use fault::{Fault, MessageFault};
pub use outcome::{CodedOutcome, Outcome, OutcomeFutureExt};
pub use retry::{
    retry_on_failure, retry_with_hooks, JitterStrategy, RetryEvent, RetryExhausted, RetryPolicy,
    RetryStrategy, DEFAULT_MAX_ATTEMPTS,
};
#[cfg(feature = "async")]
pub use retry::{retry_on_failure_async, retry_with_hooks_async};
pub use scope::{using, using_async, using_outcome, using_outcome_async, Release, Releasing};
pub use semigroup::Semigroup;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catch::{catch, catch_value, try_catch, CatchState};
    pub use crate::failure::{CodedFailure, Failure, FailureCode, FailureKind, FaultCode};
    pub use crate::fault::Fault;
    pub use crate::outcome::{CodedOutcome, Outcome, OutcomeFutureExt};
    pub use crate::retry::{retry_on_failure, RetryPolicy};
    pub use crate::scope::{using, using_outcome, Release};
    pub use crate::semigroup::Semigroup;
}
