//! Testing utilities for code built on outcomes.
//!
//! - assertion macros: [`assert_success!`](crate::assert_success),
//!   [`assert_failure!`](crate::assert_failure),
//!   [`assert_failure_message!`](crate::assert_failure_message)
//! - [`CountingResource`], a scoped resource that counts its releases
//! - (feature `proptest`) an `Arbitrary` impl for `Outcome<T>`
//!
//! # Examples
//!
//! ```rust
//! use upshot::{assert_failure, assert_success, Outcome};
//!
//! let ok: Outcome<i32> = Outcome::success(42);
//! assert_success!(ok);
//!
//! let failed: Outcome<i32> = Outcome::failure("boom");
//! assert_failure!(failed);
//! ```

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::fault::Fault;
use crate::scope::Release;

/// Assert that an outcome is a success.
///
/// Evaluates to the success value.
///
/// # Example
///
/// ```rust
/// use upshot::{assert_success, Outcome};
///
/// let value = assert_success!(Outcome::<i32>::success(42));
/// assert_eq!(value, 42);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(value) => value,
            $crate::Outcome::Failure(failure) => {
                panic!("Expected Success, got Failure: {:?}", failure);
            }
        }
    };
}

/// Assert that an outcome is a failure.
///
/// Evaluates to the failure payload.
///
/// # Example
///
/// ```rust
/// use upshot::{assert_failure, Outcome};
///
/// let failure = assert_failure!(Outcome::<i32>::failure("boom"));
/// assert_eq!(failure.message(), "boom");
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure(failure) => failure,
            $crate::Outcome::Success(value) => {
                panic!("Expected Failure, got Success: {:?}", value);
            }
        }
    };
}

/// Assert that an outcome is a failure with exactly the given message.
///
/// # Example
///
/// ```rust
/// use upshot::{assert_failure_message, Outcome};
///
/// let failed: Outcome<i32> = Outcome::failure("boom");
/// assert_failure_message!(failed, "boom");
/// ```
#[macro_export]
macro_rules! assert_failure_message {
    ($outcome:expr, $expected:expr) => {
        match $outcome {
            $crate::Outcome::Failure(failure) => {
                assert_eq!($crate::FailureKind::message(&failure), $expected);
            }
            $crate::Outcome::Success(value) => {
                panic!(
                    "Expected Failure with message {:?}, got Success: {:?}",
                    $expected, value
                );
            }
        }
    };
}

/// Shared view of how many times a [`CountingResource`] was released.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    /// Number of releases so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A scoped resource for tests.
///
/// Reading returns its label (or, for a failing resource, an
/// [`io::Error`] fault). Every [`release`](Release::release) bumps the paired
/// [`ReleaseCounter`].
///
/// # Example
///
/// ```rust
/// use upshot::testing::CountingResource;
/// use upshot::using;
///
/// let (resource, released) = CountingResource::tracked("db");
/// let label = using(move || resource, |r| r.read());
///
/// assert_eq!(label.ok(), Some("db".to_string()));
/// assert_eq!(released.count(), 1);
/// ```
#[derive(Debug)]
pub struct CountingResource {
    label: String,
    fails: bool,
    releases: ReleaseCounter,
}

impl CountingResource {
    /// A resource whose reads succeed, plus its release counter.
    pub fn tracked(label: impl Into<String>) -> (Self, ReleaseCounter) {
        CountingResource::build(label.into(), false)
    }

    /// A resource whose reads fault, plus its release counter.
    pub fn failing(label: impl Into<String>) -> (Self, ReleaseCounter) {
        CountingResource::build(label.into(), true)
    }

    fn build(label: String, fails: bool) -> (Self, ReleaseCounter) {
        let releases = ReleaseCounter::default();
        let resource = CountingResource {
            label,
            fails,
            releases: releases.clone(),
        };
        (resource, releases)
    }

    /// The label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Read the resource.
    pub fn read(&mut self) -> Result<String, Fault> {
        if self.fails {
            return Err(Fault::new(io::Error::other(format!(
                "{} is unreadable",
                self.label
            ))));
        }
        Ok(self.label.clone())
    }
}

impl Release for CountingResource {
    fn release(self) {
        self.releases.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl<T> Arbitrary for crate::Outcome<T>
where
    T: Arbitrary + 'static,
{
    type Parameters = T::Parameters;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any_with::<T>(args).prop_map(crate::Outcome::success),
            "[a-zA-Z0-9 ]{1,32}".prop_map(crate::Outcome::failure),
        ]
        .boxed()
    }
}
