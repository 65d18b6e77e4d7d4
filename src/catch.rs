//! Try/catch: turn faults of one category into failure outcomes.
//!
//! An operation that can fault returns `Result<Outcome<T, F>, Fault>`. The
//! combinators here look at the `Err` side and settle it in one of three ways:
//!
//! | State                      | Meaning                                   | Returned           |
//! |----------------------------|-------------------------------------------|--------------------|
//! | [`CatchState::Succeeded`]  | the operation returned an outcome         | `Ok(outcome)`      |
//! | [`CatchState::Caught`]     | it faulted with category `C`              | `Ok(failure)`      |
//! | [`CatchState::Escaped`]    | it faulted with any other category        | `Err(fault)`       |
//!
//! An escaped fault is handed back untouched, so `?` keeps propagating it.
//!
//! # Example
//!
//! ```rust
//! use std::io;
//! use upshot::{try_catch, Fault, Outcome};
//!
//! fn load() -> Result<Outcome<String>, Fault> {
//!     Err(io::Error::new(io::ErrorKind::NotFound, "settings.toml").into())
//! }
//!
//! let outcome = try_catch::<io::Error, _, _, _>(load, "loading settings").unwrap();
//! assert!(outcome.is_failure());
//! assert!(outcome.error_message().starts_with("loading settings\n"));
//! ```

use std::error::Error as StdError;

use crate::failure::FromFault;
use crate::fault::Fault;
use crate::outcome::Outcome;

/// How a guarded operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatchState {
    /// It returned normally; its outcome passes through.
    Succeeded,
    /// It faulted with the guarded category; the fault became a failure.
    Caught,
    /// It faulted with another category; the fault propagates.
    Escaped,
}

/// Classify a guarded operation's result against category `C`.
///
/// # Example
///
/// ```rust
/// use std::io;
/// use upshot::{classify, CatchState, Fault};
///
/// let ok: Result<i32, Fault> = Ok(1);
/// assert_eq!(classify::<io::Error, _>(&ok), CatchState::Succeeded);
///
/// let other: Result<i32, Fault> = Err(Fault::msg("boom"));
/// assert_eq!(classify::<io::Error, _>(&other), CatchState::Escaped);
/// ```
pub fn classify<C, T>(result: &Result<T, Fault>) -> CatchState
where
    C: StdError + Send + Sync + 'static,
{
    match result {
        Ok(_) => CatchState::Succeeded,
        Err(fault) if fault.is::<C>() => CatchState::Caught,
        Err(_) => CatchState::Escaped,
    }
}

fn settle<C, T, H>(result: Result<T, Fault>, on_caught: H) -> Result<T, Fault>
where
    C: StdError + Send + Sync + 'static,
    H: FnOnce(Fault) -> Result<T, Fault>,
{
    let state = classify::<C, _>(&result);
    #[cfg(feature = "tracing")]
    tracing::debug!(
        category = std::any::type_name::<C>(),
        state = ?state,
        "guarded operation settled"
    );
    match result {
        Err(fault) if state == CatchState::Caught => on_caught(fault),
        other => other,
    }
}

/// Settle an already-produced result, converting a fault of category `C`
/// into a failure headed by `prefix`.
pub(crate) fn caught_as_failure<C, T, F>(
    result: Result<Outcome<T, F>, Fault>,
    prefix: &str,
) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
{
    settle::<C, _, _>(result, |fault| {
        Ok(Outcome::Failure(F::from_fault(&fault, prefix)))
    })
}

/// Run `operation`, converting a fault of category `C` into a failure.
///
/// The failure message is the fault's flattened trace, headed by `prefix`
/// when it is non-empty. Faults of any other category come back as `Err`.
pub fn try_catch<C, T, F, Op>(operation: Op, prefix: &str) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: FnOnce() -> Result<Outcome<T, F>, Fault>,
{
    caught_as_failure::<C, _, _>(operation(), prefix)
}

/// Run `operation`, handing a fault of category `C` to `handler`.
///
/// # Example
///
/// ```rust
/// use std::io;
/// use upshot::{catch, Fault, Outcome};
///
/// let outcome = catch::<io::Error, _, _, _, _>(
///     || -> Result<Outcome<u32>, Fault> { Err(io::Error::other("cache offline").into()) },
///     |err| Outcome::failure(format!("falling back: {}", err)),
/// )
/// .unwrap();
/// assert_eq!(outcome.error_message(), "falling back: cache offline");
/// ```
pub fn catch<C, T, F, Op, H>(operation: Op, handler: H) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    Op: FnOnce() -> Result<Outcome<T, F>, Fault>,
    H: FnOnce(C) -> Outcome<T, F>,
{
    settle::<C, _, _>(operation(), |fault| fault.downcast::<C>().map(handler))
}

/// [`try_catch`] for operations that produce a plain value.
///
/// A returned value becomes a success.
pub fn catch_value<C, T, F, Op>(operation: Op, prefix: &str) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: FnOnce() -> Result<T, Fault>,
{
    try_catch::<C, _, _, _>(|| operation().map(Outcome::Success), prefix)
}

/// Asynchronous [`try_catch`].
pub async fn try_catch_async<C, T, F, Op>(
    operation: Op,
    prefix: &str,
) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: AsyncFnOnce() -> Result<Outcome<T, F>, Fault>,
{
    caught_as_failure::<C, _, _>(operation().await, prefix)
}

/// Asynchronous [`catch`].
pub async fn catch_async<C, T, F, Op, H>(operation: Op, handler: H) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    Op: AsyncFnOnce() -> Result<Outcome<T, F>, Fault>,
    H: FnOnce(C) -> Outcome<T, F>,
{
    let result = operation().await;
    settle::<C, _, _>(result, |fault| fault.downcast::<C>().map(handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{CodedFailure, FailureCode, FaultCode};
    use crate::fault::MessageFault;
    use crate::{CodedOutcome, Failure};
    use std::cell::Cell;
    use std::fmt;

    #[derive(Debug)]
    struct Timeout;

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "operation timed out")
        }
    }

    impl StdError for Timeout {}

    #[derive(Debug)]
    struct Corrupt(&'static str);

    impl fmt::Display for Corrupt {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "corrupt block {}", self.0)
        }
    }

    impl StdError for Corrupt {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Code {
        None,
        Unavailable,
    }

    impl FailureCode for Code {
        const NONE: Self = Code::None;
    }

    impl FaultCode for Code {
        const FAULT: Self = Code::Unavailable;
    }

    #[test]
    fn test_success_passes_through() {
        let outcome = try_catch::<Timeout, _, Failure, _>(|| Ok(Outcome::success(7)), "")
            .unwrap();
        assert_eq!(outcome, Outcome::success(7));
    }

    #[test]
    fn test_failure_outcome_passes_through() {
        let outcome =
            try_catch::<Timeout, i32, _, _>(|| Ok(Outcome::failure("already failed")), "ctx")
                .unwrap();
        assert_eq!(outcome.error_message(), "already failed");
    }

    #[test]
    fn test_matching_fault_is_caught() {
        let outcome: Outcome<i32> =
            try_catch::<Timeout, _, _, _>(|| Err(Fault::new(Timeout)), "calling billing")
                .unwrap();

        let message = outcome.error_message();
        assert!(message.starts_with("calling billing\n"));
        assert!(message.contains("Fault message: operation timed out"));
        assert!(message.contains("Timeout"));
    }

    #[test]
    fn test_other_category_escapes() {
        // An unrelated category is handed back untouched.
        let result: Result<Outcome<i32>, Fault> =
            try_catch::<Timeout, _, _, _>(|| Err(Fault::new(Corrupt("42"))), "");

        let fault = result.unwrap_err();
        assert!(fault.is::<Corrupt>());
        assert_eq!(fault.message(), "corrupt block 42");
    }

    #[test]
    fn test_question_mark_inside_operation() {
        fn parse(raw: &str) -> Result<Outcome<i32>, Fault> {
            let n: i32 = raw.parse()?;
            Ok(Outcome::success(n))
        }

        let caught = try_catch::<std::num::ParseIntError, _, _, _>(|| parse("x"), "").unwrap();
        assert!(caught.is_failure());

        let parsed = try_catch::<std::num::ParseIntError, _, _, _>(|| parse("5"), "").unwrap();
        assert_eq!(parsed, Outcome::success(5));
    }

    #[test]
    fn test_catch_hands_typed_error_to_handler() {
        let outcome: Outcome<i32> = catch::<Corrupt, _, _, _, _>(
            || Err(Fault::new(Corrupt("7"))),
            |err| Outcome::failure(format!("skipping block {}", err.0)),
        )
        .unwrap();
        assert_eq!(outcome.error_message(), "skipping block 7");
    }

    #[test]
    fn test_catch_does_not_call_handler_on_escape() {
        let called = Cell::new(false);
        let result: Result<Outcome<i32>, Fault> = catch::<Corrupt, _, _, _, _>(
            || Err(Fault::msg("unrelated")),
            |_| {
                called.set(true);
                Outcome::success(0)
            },
        );

        assert!(!called.get());
        assert!(result.unwrap_err().is::<MessageFault>());
    }

    #[test]
    fn test_catch_value_wraps_success() {
        let outcome: Outcome<&str> =
            catch_value::<Timeout, _, _, _>(|| Ok("ready"), "").unwrap();
        assert_eq!(outcome, Outcome::success("ready"));

        let outcome: Outcome<&str> =
            catch_value::<Timeout, _, _, _>(|| Err(Fault::new(Timeout)), "").unwrap();
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_coded_failure_uses_fault_code() {
        let outcome: CodedOutcome<i32, Code> =
            try_catch::<Timeout, _, CodedFailure<Code>, _>(|| Err(Fault::new(Timeout)), "")
                .unwrap();
        assert_eq!(outcome.error_code(), Code::Unavailable);
        assert!(outcome.error_message().starts_with("Unavailable\n"));
    }

    #[test]
    fn test_classify() {
        let ok: Result<(), Fault> = Ok(());
        let caught: Result<(), Fault> = Err(Fault::new(Timeout));
        let escaped: Result<(), Fault> = Err(Fault::new(Corrupt("1")));

        assert_eq!(classify::<Timeout, _>(&ok), CatchState::Succeeded);
        assert_eq!(classify::<Timeout, _>(&caught), CatchState::Caught);
        assert_eq!(classify::<Timeout, _>(&escaped), CatchState::Escaped);
    }

    #[tokio::test]
    async fn test_try_catch_async() {
        let outcome: Outcome<i32> = try_catch_async::<Timeout, _, _, _>(
            async || {
                tokio::task::yield_now().await;
                Err(Fault::new(Timeout))
            },
            "async call",
        )
        .await
        .unwrap();
        assert!(outcome.error_message().starts_with("async call\n"));

        let escaped: Result<Outcome<i32>, Fault> =
            try_catch_async::<Timeout, _, _, _>(async || Err(Fault::msg("other")), "").await;
        assert!(escaped.is_err());
    }

    #[tokio::test]
    async fn test_catch_async() {
        let outcome: Outcome<i32> = catch_async::<Timeout, _, _, _, _>(
            async || Err(Fault::new(Timeout)),
            |_| Outcome::success(-1),
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::success(-1));
    }

    #[cfg(feature = "tracing")]
    mod logging {
        use super::*;
        use tracing_test::traced_test;

        #[traced_test]
        #[test]
        fn test_logs_settled_state() {
            let _ = try_catch::<Timeout, i32, Failure, _>(|| Err(Fault::new(Timeout)), "");
            assert!(logs_contain("guarded operation settled"));
            assert!(logs_contain("Caught"));

            let _ = try_catch::<Timeout, i32, Failure, _>(|| Err(Fault::msg("x")), "");
            assert!(logs_contain("Escaped"));
        }
    }
}
