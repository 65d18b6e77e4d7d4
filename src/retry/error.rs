//! The result of running out of attempts.

use std::fmt;
use std::time::Duration;

use crate::failure::FailureKind;

/// Every attempt failed.
///
/// Holds the failure from the final attempt along with metadata about the
/// retry sequence. [`into_failure`](Self::into_failure) turns it into the
/// failure the retry combinators return.
///
/// # Examples
///
/// ```rust
/// use upshot::{Failure, RetryExhausted};
/// use std::time::Duration;
///
/// let exhausted = RetryExhausted::new(Failure::new("connection refused"), 3, Duration::ZERO);
/// assert_eq!(
///     exhausted.into_failure().message(),
///     "Maximum number of retries (3) reached:\nconnection refused"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<F> {
    /// The failure from the final attempt.
    pub final_failure: F,
    /// Total number of attempts made.
    pub attempts: u32,
    /// Total time spent, pauses included.
    pub total_duration: Duration,
}

impl<F> RetryExhausted<F> {
    /// Create a new RetryExhausted.
    pub fn new(final_failure: F, attempts: u32, total_duration: Duration) -> Self {
        Self {
            final_failure,
            attempts,
            total_duration,
        }
    }

    /// Get a reference to the final failure.
    pub fn failure(&self) -> &F {
        &self.final_failure
    }
}

impl<F: FailureKind> RetryExhausted<F> {
    /// The exhaustion message: the attempt count, then the final failure's
    /// message on the next line.
    pub fn message(&self) -> String {
        format!(
            "Maximum number of retries ({}) reached:\n{}",
            self.attempts,
            self.final_failure.message()
        )
    }

    /// Convert into a failure carrying the exhaustion message.
    ///
    /// The final failure's category (its code, for a coded failure) is kept.
    pub fn into_failure(self) -> F {
        let message = self.message();
        self.final_failure.with_message(message)
    }
}

impl<F: FailureKind> fmt::Display for RetryExhausted<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl<F: FailureKind + fmt::Debug> std::error::Error for RetryExhausted<F> {}

#[cfg(test)]
mod error_tests {
    use super::*;
    use crate::failure::{CodedFailure, Failure, FailureCode};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Code {
        None,
        Busy,
    }

    impl FailureCode for Code {
        const NONE: Self = Code::None;
    }

    #[test]
    fn test_retry_exhausted_display() {
        let err = RetryExhausted::new(Failure::new("connection failed"), 3, Duration::from_millis(500));
        let display = format!("{}", err);
        assert!(display.starts_with("Maximum number of retries (3) reached:"));
        assert!(display.ends_with("\nconnection failed"));
    }

    #[test]
    fn test_into_failure_keeps_code() {
        let err = RetryExhausted::new(CodedFailure::new(Code::Busy), 2, Duration::ZERO);
        let failure = err.into_failure();
        assert_eq!(failure.code(), Code::Busy);
        assert_eq!(failure.message(), "Maximum number of retries (2) reached:\nBusy");
    }

    #[test]
    fn test_failure_accessor() {
        let err = RetryExhausted::new(Failure::new("last"), 1, Duration::ZERO);
        assert_eq!(err.failure().message(), "last");
        assert_eq!(err.attempts, 1);
    }
}
