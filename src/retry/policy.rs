//! Retry policy types and configuration.

use std::time::Duration;

use crate::failure::InvariantViolation;

/// Attempts allowed by a policy that does not say otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A retry policy describing how to re-run a failing operation.
///
/// Policies are pure data - they describe retry behavior but don't execute it.
/// They can be cloned and compared freely.
///
/// # Attempts
///
/// `max_attempts` counts every run of the operation, the first one included,
/// and is always at least 1. A policy with `max_attempts == 1` runs the
/// operation once and never pauses.
///
/// # Examples
///
/// ```rust
/// use upshot::RetryPolicy;
/// use std::time::Duration;
///
/// // Exponential backoff, five attempts in total
/// let policy = RetryPolicy::exponential(Duration::from_millis(100))
///     .with_max_attempts(5);
///
/// assert_eq!(policy.max_attempts(), 5);
///
/// // Constant delay with a cap
/// let policy = RetryPolicy::constant(Duration::from_millis(500))
///     .with_max_delay(Duration::from_secs(30));
/// assert_eq!(policy.max_attempts(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    strategy: RetryStrategy,
    max_attempts: u32,
    max_delay: Option<Duration>,
    jitter: JitterStrategy,
}

/// The backoff strategy for retry delays.
///
/// Delays are indexed by retry: the pause before the second attempt is
/// retry 0, before the third attempt retry 1, and so on.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Fixed delay between attempts.
    Constant(Duration),
    /// Delay increases linearly: base * (retry + 1).
    Linear {
        /// Base delay duration.
        base: Duration,
    },
    /// Delay doubles: base * 2^retry.
    Exponential {
        /// Base delay duration.
        base: Duration,
    },
    /// Delay follows Fibonacci sequence: fib(retry + 1) * base.
    Fibonacci {
        /// Base delay duration.
        base: Duration,
    },
}

/// Strategy for adding randomness to delays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JitterStrategy {
    /// No jitter applied.
    #[default]
    None,
    /// Add ±percentage randomness to delay.
    Proportional(f64),
    /// Random delay between 0 and calculated delay.
    Full,
    /// Random delay between the base and 3x the previous delay.
    Decorrelated,
}

impl RetryPolicy {
    /// Create a policy from a strategy and an attempt budget.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is 0.
    #[track_caller]
    pub fn new(strategy: RetryStrategy, max_attempts: u32) -> Self {
        match RetryPolicy::try_new(strategy, max_attempts) {
            Ok(policy) => policy,
            Err(violation) => panic!("{}", violation),
        }
    }

    /// Create a policy, reporting a zero attempt budget instead of panicking.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upshot::{InvariantViolation, RetryPolicy, RetryStrategy};
    /// use std::time::Duration;
    ///
    /// let strategy = RetryStrategy::Constant(Duration::ZERO);
    /// assert_eq!(
    ///     RetryPolicy::try_new(strategy, 0),
    ///     Err(InvariantViolation::ZeroAttempts)
    /// );
    /// ```
    pub fn try_new(
        strategy: RetryStrategy,
        max_attempts: u32,
    ) -> Result<Self, InvariantViolation> {
        if max_attempts == 0 {
            return Err(InvariantViolation::ZeroAttempts);
        }
        Ok(Self {
            strategy,
            max_attempts,
            max_delay: None,
            jitter: JitterStrategy::None,
        })
    }

    /// Create a policy with constant delay between attempts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upshot::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::constant(Duration::from_millis(500))
    ///     .with_max_attempts(3);
    ///
    /// assert_eq!(policy.delay_before_attempt(1), None); // first attempt runs at once
    /// assert_eq!(policy.delay_before_attempt(2), Some(Duration::from_millis(500)));
    /// assert_eq!(policy.delay_before_attempt(3), Some(Duration::from_millis(500)));
    /// assert_eq!(policy.delay_before_attempt(4), None); // max_attempts exceeded
    /// ```
    pub fn constant(delay: Duration) -> Self {
        Self::new(RetryStrategy::Constant(delay), DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a policy with linearly increasing delay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upshot::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::linear(Duration::from_millis(100))
    ///     .with_max_attempts(5);
    ///
    /// // Delay increases: 100ms, 200ms, 300ms, 400ms
    /// assert_eq!(policy.delay_before_attempt(2), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_before_attempt(3), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_before_attempt(4), Some(Duration::from_millis(300)));
    /// ```
    pub fn linear(base: Duration) -> Self {
        Self::new(RetryStrategy::Linear { base }, DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a policy with exponentially increasing delay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upshot::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::exponential(Duration::from_millis(100))
    ///     .with_max_attempts(5);
    ///
    /// // Delay doubles: 100ms, 200ms, 400ms, 800ms
    /// assert_eq!(policy.delay_before_attempt(2), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_before_attempt(3), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_before_attempt(4), Some(Duration::from_millis(400)));
    /// ```
    pub fn exponential(base: Duration) -> Self {
        Self::new(RetryStrategy::Exponential { base }, DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a policy with Fibonacci-based delay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upshot::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::fibonacci(Duration::from_millis(100))
    ///     .with_max_attempts(6);
    ///
    /// // Delay follows Fibonacci: 100ms, 100ms, 200ms, 300ms, 500ms
    /// assert_eq!(policy.delay_before_attempt(2), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_before_attempt(3), Some(Duration::from_millis(100)));
    /// assert_eq!(policy.delay_before_attempt(4), Some(Duration::from_millis(200)));
    /// assert_eq!(policy.delay_before_attempt(5), Some(Duration::from_millis(300)));
    /// assert_eq!(policy.delay_before_attempt(6), Some(Duration::from_millis(500)));
    /// ```
    pub fn fibonacci(base: Duration) -> Self {
        Self::new(RetryStrategy::Fibonacci { base }, DEFAULT_MAX_ATTEMPTS)
    }

    /// Set the total number of attempts, the first one included.
    ///
    /// # Panics
    ///
    /// Panics if `n` is 0.
    #[track_caller]
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        if n == 0 {
            panic!("{}", InvariantViolation::ZeroAttempts);
        }
        self.max_attempts = n;
        self
    }

    /// Set the maximum delay cap.
    ///
    /// Delays will never exceed this value, regardless of the backoff strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use upshot::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::exponential(Duration::from_millis(100))
    ///     .with_max_attempts(10)
    ///     .with_max_delay(Duration::from_millis(300));
    ///
    /// assert_eq!(policy.delay_before_attempt(4), Some(Duration::from_millis(300)));
    /// ```
    pub fn with_max_delay(mut self, d: Duration) -> Self {
        self.max_delay = Some(d);
        self
    }

    /// Add proportional jitter to delays.
    ///
    /// The factor determines the range of randomness. For example, `0.25` means
    /// the actual delay will be ±25% of the calculated delay.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, this method does nothing.
    pub fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter = JitterStrategy::Proportional(factor.clamp(0.0, 1.0));
        self
    }

    /// Use full jitter: a random delay between 0 and the calculated delay.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, this method does nothing.
    pub fn with_full_jitter(mut self) -> Self {
        self.jitter = JitterStrategy::Full;
        self
    }

    /// Use decorrelated jitter: each delay is random between the base and
    /// 3x the previous delay.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, this method does nothing.
    pub fn with_decorrelated_jitter(mut self) -> Self {
        self.jitter = JitterStrategy::Decorrelated;
        self
    }

    /// Get the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the maximum delay cap.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Get the jitter strategy.
    pub fn jitter(&self) -> &JitterStrategy {
        &self.jitter
    }

    /// Get the retry strategy.
    pub fn strategy(&self) -> &RetryStrategy {
        &self.strategy
    }

    /// The pause before attempt `attempt` (1-indexed), without jitter.
    ///
    /// `None` for the first attempt and for any attempt past `max_attempts`.
    pub fn delay_before_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 || attempt > self.max_attempts {
            return None;
        }
        let retry = attempt - 2;

        let base_delay = match &self.strategy {
            RetryStrategy::Constant(d) => *d,
            RetryStrategy::Linear { base } => base.saturating_mul(retry.saturating_add(1)),
            RetryStrategy::Exponential { base } => base.saturating_mul(2u32.saturating_pow(retry)),
            RetryStrategy::Fibonacci { base } => {
                base.saturating_mul(fibonacci(retry.saturating_add(1)))
            }
        };

        let capped = match self.max_delay {
            Some(max) => base_delay.min(max),
            None => base_delay,
        };

        Some(capped)
    }

    /// The pause before attempt `attempt` with jitter applied.
    ///
    /// Used by the retry executor.
    #[doc(hidden)]
    pub fn delay_with_jitter(
        &self,
        attempt: u32,
        prev_delay: Option<Duration>,
    ) -> Option<Duration> {
        let base_delay = self.delay_before_attempt(attempt)?;
        Some(self.jitter.apply(base_delay, prev_delay, self.max_delay))
    }
}

impl Default for RetryPolicy {
    /// Three attempts, no pause between them.
    fn default() -> Self {
        RetryPolicy::constant(Duration::ZERO)
    }
}

impl JitterStrategy {
    /// Apply jitter to a base delay.
    ///
    /// # Arguments
    ///
    /// * `base_delay` - The calculated delay before jitter
    /// * `prev_delay` - The previous delay (for decorrelated jitter)
    /// * `max_delay` - Optional cap on the final delay
    pub fn apply(
        &self,
        base_delay: Duration,
        prev_delay: Option<Duration>,
        max_delay: Option<Duration>,
    ) -> Duration {
        let jittered = self.jitter(base_delay, prev_delay);
        match max_delay {
            Some(max) => jittered.min(max),
            None => jittered,
        }
    }

    #[cfg(feature = "jitter")]
    fn jitter(&self, base: Duration, prev: Option<Duration>) -> Duration {
        match self.window(base, prev) {
            Some((low, high)) => sample_between(low, high),
            None => base,
        }
    }

    #[cfg(not(feature = "jitter"))]
    fn jitter(&self, base: Duration, _prev: Option<Duration>) -> Duration {
        base
    }

    /// The range a jittered delay is drawn from, or `None` to keep `base` as is.
    #[cfg(feature = "jitter")]
    fn window(&self, base: Duration, prev: Option<Duration>) -> Option<(Duration, Duration)> {
        match *self {
            JitterStrategy::None => None,
            JitterStrategy::Proportional(factor) => {
                let secs = base.as_secs_f64();
                let spread = secs * factor;
                let low = Duration::try_from_secs_f64((secs - spread).max(0.0)).ok()?;
                let high = Duration::try_from_secs_f64(secs + spread).ok()?;
                Some((low, high))
            }
            JitterStrategy::Full => Some((Duration::ZERO, base)),
            JitterStrategy::Decorrelated => {
                Some((base, prev.unwrap_or(base).saturating_mul(3)))
            }
        }
    }
}

/// Pick a delay uniformly from `low..=high`, at sub-millisecond precision.
#[cfg(feature = "jitter")]
fn sample_between(low: Duration, high: Duration) -> Duration {
    use rand::Rng;

    if high <= low {
        return low;
    }
    let secs = rand::rng().random_range(low.as_secs_f64()..=high.as_secs_f64());
    Duration::try_from_secs_f64(secs).unwrap_or(low)
}

/// The `n`th Fibonacci number, saturating at `u32::MAX`.
fn fibonacci(n: u32) -> u32 {
    (0..n)
        .fold((0u32, 1u32), |(current, next), _| {
            (next, current.saturating_add(next))
        })
        .0
}
