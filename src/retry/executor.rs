//! Running an operation under a [`RetryPolicy`].

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use crate::catch::caught_as_failure;
use crate::failure::{FailureKind, FromFault};
use crate::fault::Fault;
use crate::outcome::Outcome;

use super::error::RetryExhausted;
use super::policy::RetryPolicy;

/// Information about a failed attempt, passed to hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, F> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The failure from that attempt.
    pub failure: &'a F,
    /// Pause before the next attempt; `None` when this was the last one.
    pub next_delay: Option<Duration>,
    /// Total elapsed time since the first attempt started.
    pub elapsed: Duration,
}

/// Bookkeeping shared by the sync and async loops.
struct Attempts<'p> {
    policy: &'p RetryPolicy,
    start: Instant,
    attempt: u32,
    prev_delay: Option<Duration>,
}

impl<'p> Attempts<'p> {
    fn new(policy: &'p RetryPolicy) -> Self {
        Attempts {
            policy,
            start: Instant::now(),
            attempt: 1,
            prev_delay: None,
        }
    }

    fn succeeded(&self) {
        #[cfg(feature = "tracing")]
        {
            if self.attempt > 1 {
                tracing::debug!(attempt = self.attempt, "operation succeeded after retrying");
            }
        }
    }

    /// Record a failed attempt.
    ///
    /// Returns the pause before the next attempt, or the exhaustion failure
    /// once the budget is spent.
    fn failed<F, H>(&mut self, failure: F, on_retry: &mut H) -> Result<Duration, F>
    where
        F: FailureKind,
        H: FnMut(&RetryEvent<'_, F>),
    {
        let next_delay = self
            .attempt
            .checked_add(1)
            .and_then(|next| self.policy.delay_with_jitter(next, self.prev_delay));

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempt = self.attempt,
            max_attempts = self.policy.max_attempts(),
            next_delay = ?next_delay,
            message = failure.message(),
            "attempt failed"
        );

        on_retry(&RetryEvent {
            attempt: self.attempt,
            failure: &failure,
            next_delay,
            elapsed: self.start.elapsed(),
        });

        match next_delay {
            Some(delay) => {
                self.prev_delay = Some(delay);
                self.attempt += 1;
                Ok(delay)
            }
            None => {
                let exhausted = RetryExhausted::new(failure, self.attempt, self.start.elapsed());
                #[cfg(feature = "tracing")]
                tracing::error!(
                    attempts = exhausted.attempts,
                    elapsed = ?exhausted.total_duration,
                    "retries exhausted"
                );
                Err(exhausted.into_failure())
            }
        }
    }
}

/// Re-run `operation` until it succeeds or the policy's attempts run out.
///
/// An attempt fails when the operation returns a failure outcome or faults
/// with category `C`; the caught fault becomes a failure through the usual
/// flattening. A fault of any other category ends the loop at once and comes
/// back as `Err`.
///
/// Attempts run one after another on the calling thread, pausing with
/// [`std::thread::sleep`] between them. When every attempt fails the result
/// is a failure whose message names the attempt count and embeds the last
/// attempt's message.
///
/// # Example
///
/// ```rust
/// use std::io;
/// use upshot::{retry_on_failure, Fault, Outcome, RetryPolicy};
///
/// let mut calls = 0;
/// let outcome = retry_on_failure::<io::Error, _, _, _>(
///     || -> Result<Outcome<&str>, Fault> {
///         calls += 1;
///         if calls < 3 {
///             Err(io::Error::other("flaky").into())
///         } else {
///             Ok(Outcome::success("done"))
///         }
///     },
///     &RetryPolicy::default(),
/// )
/// .unwrap();
///
/// assert_eq!(outcome, Outcome::success("done"));
/// assert_eq!(calls, 3);
/// ```
pub fn retry_on_failure<C, T, F, Op>(
    operation: Op,
    policy: &RetryPolicy,
) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: FnMut() -> Result<Outcome<T, F>, Fault>,
{
    retry_with_hooks::<C, _, _, _, _>(operation, policy, |_| {})
}

/// [`retry_on_failure`] with an observer called after every failed attempt.
///
/// The hook sees the attempt number, that attempt's failure, the pause about
/// to happen (`None` after the last attempt) and the time elapsed so far.
///
/// # Example
///
/// ```rust
/// use upshot::{retry_with_hooks, Fault, MessageFault, Outcome, RetryEvent, RetryPolicy};
///
/// let mut seen = Vec::new();
/// let outcome = retry_with_hooks::<MessageFault, (), _, _, _>(
///     || -> Result<Outcome<()>, Fault> { Ok(Outcome::failure("still down")) },
///     &RetryPolicy::default().with_max_attempts(2),
///     |event: &RetryEvent<'_, _>| seen.push((event.attempt, event.next_delay.is_some())),
/// )
/// .unwrap();
///
/// assert!(outcome.is_failure());
/// assert_eq!(seen, vec![(1, true), (2, false)]);
/// ```
pub fn retry_with_hooks<C, T, F, Op, H>(
    mut operation: Op,
    policy: &RetryPolicy,
    mut on_retry: H,
) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: FnMut() -> Result<Outcome<T, F>, Fault>,
    H: FnMut(&RetryEvent<'_, F>),
{
    let mut attempts = Attempts::new(policy);
    loop {
        match caught_as_failure::<C, _, _>(operation(), "")? {
            Outcome::Success(value) => {
                attempts.succeeded();
                return Ok(Outcome::Success(value));
            }
            Outcome::Failure(failure) => match attempts.failed(failure, &mut on_retry) {
                Ok(delay) => std::thread::sleep(delay),
                Err(failure) => return Ok(Outcome::Failure(failure)),
            },
        }
    }
}

/// Asynchronous [`retry_on_failure`]; pauses with [`tokio::time::sleep`].
///
/// # Example
///
/// ```rust
/// use std::io;
/// use upshot::{retry_on_failure_async, Fault, Outcome, RetryPolicy};
///
/// # tokio_test::block_on(async {
/// let mut calls = 0;
/// let outcome = retry_on_failure_async::<io::Error, _, _, _>(
///     async || {
///         calls += 1;
///         Ok::<_, Fault>(Outcome::<u32>::success(calls))
///     },
///     &RetryPolicy::default(),
/// )
/// .await
/// .unwrap();
/// assert_eq!(outcome, Outcome::success(1));
/// # });
/// ```
#[cfg(feature = "async")]
pub async fn retry_on_failure_async<C, T, F, Op>(
    operation: Op,
    policy: &RetryPolicy,
) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: AsyncFnMut() -> Result<Outcome<T, F>, Fault>,
{
    retry_with_hooks_async::<C, _, _, _, _>(operation, policy, |_| {}).await
}

/// Asynchronous [`retry_with_hooks`].
#[cfg(feature = "async")]
pub async fn retry_with_hooks_async<C, T, F, Op, H>(
    mut operation: Op,
    policy: &RetryPolicy,
    mut on_retry: H,
) -> Result<Outcome<T, F>, Fault>
where
    C: StdError + Send + Sync + 'static,
    F: FromFault,
    Op: AsyncFnMut() -> Result<Outcome<T, F>, Fault>,
    H: FnMut(&RetryEvent<'_, F>),
{
    let mut attempts = Attempts::new(policy);
    loop {
        match caught_as_failure::<C, _, _>(operation().await, "")? {
            Outcome::Success(value) => {
                attempts.succeeded();
                return Ok(Outcome::Success(value));
            }
            Outcome::Failure(failure) => match attempts.failed(failure, &mut on_retry) {
                Ok(delay) => tokio::time::sleep(delay).await,
                Err(failure) => return Ok(Outcome::Failure(failure)),
            },
        }
    }
}
