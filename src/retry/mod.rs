//! Bounded retry for outcome-producing operations.
//!
//! - [`RetryPolicy`] is pure data: how many attempts, how long to pause
//!   between them.
//! - [`retry_on_failure`] (and [`retry_on_failure_async`] with the `async`
//!   feature) re-run an operation until it succeeds or the attempts run out.
//!
//! An attempt fails when the operation returns a failure outcome or faults
//! with the retryable category `C`. Any other fault is not retried: it comes
//! straight back as `Err(Fault)`.
//!
//! # Quick Start
//!
//! ```rust
//! use std::io;
//! use std::time::Duration;
//! use upshot::{retry_on_failure, Fault, Outcome, RetryPolicy};
//!
//! let policy = RetryPolicy::constant(Duration::from_millis(1)).with_max_attempts(3);
//!
//! let outcome = retry_on_failure::<io::Error, (), _, _>(
//!     || -> Result<Outcome<()>, Fault> { Err(io::Error::other("unreachable host").into()) },
//!     &policy,
//! )
//! .unwrap();
//!
//! assert!(outcome
//!     .error_message()
//!     .starts_with("Maximum number of retries (3) reached:\n"));
//! ```
//!
//! # Retry Strategies
//!
//! - **Constant**: Fixed delay between attempts
//! - **Linear**: Delay increases linearly (100ms, 200ms, 300ms, ...)
//! - **Exponential**: Delay doubles each retry (100ms, 200ms, 400ms, ...)
//! - **Fibonacci**: Delay follows Fibonacci sequence
//!
//! # Jitter Support
//!
//! Enable the `jitter` feature to randomize delays:
//!
//! ```toml
//! upshot = { version = "...", features = ["jitter"] }
//! ```
//!
//! ```rust,ignore
//! use upshot::RetryPolicy;
//! use std::time::Duration;
//!
//! // Add ±25% randomness to delays
//! let policy = RetryPolicy::exponential(Duration::from_millis(100))
//!     .with_jitter(0.25)
//!     .with_max_attempts(5);
//! ```

mod error;
mod executor;
mod policy;

pub use error::RetryExhausted;
pub use executor::{retry_on_failure, retry_with_hooks, RetryEvent};
#[cfg(feature = "async")]
pub use executor::{retry_on_failure_async, retry_with_hooks_async};
pub use policy::{JitterStrategy, RetryPolicy, RetryStrategy, DEFAULT_MAX_ATTEMPTS};
