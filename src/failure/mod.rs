//! Failure payloads carried by [`Outcome::Failure`](crate::Outcome::Failure).
//!
//! - [`Failure`] - a non-empty message
//! - [`CodedFailure`] - a non-empty message plus a [`FailureCode`]
//!
//! Both payloads check their invariants when they are built, so an
//! `Outcome::Failure` can never hold an empty message or the "no error"
//! code. Breaking an invariant is a programming error: the plain constructors
//! panic, and the `try_new` constructors report an [`InvariantViolation`].

mod code;
#[cfg(feature = "serde")]
mod serde_impl;

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::fault::Fault;
use crate::semigroup::Semigroup;

pub use code::{CodeSet, FailureCode, FaultCode};

/// A construction invariant that was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A failure was built with an empty message.
    EmptyMessage,
    /// A coded failure was built with the "no error" code.
    SentinelCode,
    /// A retry policy was built allowing zero attempts.
    ZeroAttempts,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::EmptyMessage => {
                write!(f, "there must be an error message for a failed outcome")
            }
            InvariantViolation::SentinelCode => {
                write!(f, "there must be an error code for a failed outcome")
            }
            InvariantViolation::ZeroAttempts => {
                write!(f, "a retry policy must allow at least one attempt")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Behaviour shared by every failure payload.
///
/// Generic outcome code is written against this trait rather than against a
/// concrete payload.
pub trait FailureKind: Sized {
    /// The (never empty) failure message.
    fn message(&self) -> &str;

    /// Whether two failures belong to the same category.
    ///
    /// Messages are not compared.
    fn same_category(&self, other: &Self) -> bool;

    /// Feed the category into a hasher, consistently with
    /// [`same_category`](Self::same_category).
    fn hash_category<H: Hasher>(&self, state: &mut H);

    /// Replace the message, keeping the category.
    ///
    /// # Panics
    ///
    /// Panics if `message` is empty.
    fn with_message(self, message: String) -> Self;

    /// Prefix the message with a line of context.
    fn with_context(self, context: &str) -> Self {
        if context.is_empty() {
            return self;
        }
        let message = format!("{}\n{}", context, self.message());
        self.with_message(message)
    }
}

/// Failure payloads that can be built from a caught [`Fault`].
pub trait FromFault: FailureKind {
    /// Build a failure whose message is the fault's flattened trace.
    fn from_fault(fault: &Fault, prefix: &str) -> Self;
}

fn ensure_message(message: String) -> Result<String, InvariantViolation> {
    if message.is_empty() {
        Err(InvariantViolation::EmptyMessage)
    } else {
        Ok(message)
    }
}

/// A failure described by a message.
///
/// # Examples
///
/// ```
/// use upshot::Failure;
///
/// let failure = Failure::new("connection refused");
/// assert_eq!(failure.message(), "connection refused");
///
/// assert!(Failure::try_new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Failure {
    message: String,
}

impl Failure {
    /// Create a failure.
    ///
    /// # Panics
    ///
    /// Panics if `message` is empty.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        match Failure::try_new(message) {
            Ok(failure) => failure,
            Err(violation) => panic!("{}", violation),
        }
    }

    /// Create a failure, reporting an empty message instead of panicking.
    pub fn try_new(message: impl Into<String>) -> Result<Self, InvariantViolation> {
        let message = ensure_message(message.into())?;
        Ok(Failure { message })
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the failure, returning its message.
    pub fn into_message(self) -> String {
        self.message
    }
}

impl FailureKind for Failure {
    fn message(&self) -> &str {
        &self.message
    }

    fn same_category(&self, _other: &Self) -> bool {
        true
    }

    fn hash_category<H: Hasher>(&self, _state: &mut H) {}

    #[track_caller]
    fn with_message(self, message: String) -> Self {
        Failure::new(message)
    }
}

impl FromFault for Failure {
    fn from_fault(fault: &Fault, prefix: &str) -> Self {
        Failure::new(fault.message_stack(prefix))
    }
}

impl Semigroup for Failure {
    fn combine(self, other: Self) -> Self {
        Failure {
            message: format!("{}\n{}", self.message, other.message),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A failure carrying a code from a caller-defined [`FailureCode`] enum.
///
/// A coded failure always holds at least one non-sentinel code. After
/// [`combine`](Semigroup::combine) it may hold several; the first one is the
/// representative returned by [`code`](Self::code).
///
/// # Examples
///
/// ```
/// use upshot::{CodedFailure, FailureCode};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum HttpError { None, NotFound, Unavailable }
///
/// impl FailureCode for HttpError {
///     const NONE: Self = HttpError::None;
/// }
///
/// let failure = CodedFailure::new(HttpError::NotFound);
/// assert_eq!(failure.code(), HttpError::NotFound);
/// assert_eq!(failure.message(), "NotFound");
///
/// let failure = CodedFailure::with_message(HttpError::Unavailable, "maintenance window");
/// assert_eq!(failure.message(), "maintenance window");
///
/// assert!(CodedFailure::try_new(HttpError::None, "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedFailure<C> {
    codes: CodeSet<C>,
    message: String,
}

impl<C: FailureCode> CodedFailure<C> {
    /// Create a failure whose message is the code's symbolic name.
    ///
    /// # Panics
    ///
    /// Panics if `code` is the sentinel.
    #[track_caller]
    pub fn new(code: C) -> Self {
        CodedFailure::with_message(code, "")
    }

    /// Create a failure with an explicit message.
    ///
    /// An empty message falls back to the code's symbolic name.
    ///
    /// # Panics
    ///
    /// Panics if `code` is the sentinel.
    #[track_caller]
    pub fn with_message(code: C, message: impl Into<String>) -> Self {
        match CodedFailure::try_new(code, message) {
            Ok(failure) => failure,
            Err(violation) => panic!("{}", violation),
        }
    }

    /// Create a coded failure, reporting a sentinel code instead of panicking.
    pub fn try_new(code: C, message: impl Into<String>) -> Result<Self, InvariantViolation> {
        if code.is_none() {
            return Err(InvariantViolation::SentinelCode);
        }
        let message = message.into();
        let message = if message.is_empty() {
            code.name()
        } else {
            message
        };
        Ok(CodedFailure {
            codes: CodeSet::single(code),
            message: ensure_message(message)?,
        })
    }

    /// Build a coded failure from a fault's flattened trace.
    ///
    /// An empty `prefix` falls back to the code's symbolic name.
    ///
    /// # Panics
    ///
    /// Panics if `code` is the sentinel.
    #[track_caller]
    pub fn from_fault(fault: &Fault, code: C, prefix: &str) -> Self {
        let prefix = if prefix.is_empty() {
            code.name()
        } else {
            prefix.to_string()
        };
        CodedFailure::with_message(code, fault.message_stack(&prefix))
    }

    /// The representative code.
    pub fn code(&self) -> C {
        // A coded failure is never built without a code.
        self.codes.first().unwrap_or(C::NONE)
    }

    /// Every code this failure has accumulated.
    pub fn codes(&self) -> &CodeSet<C> {
        &self.codes
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Drop the code, keeping the message.
    pub fn uncoded(self) -> Failure {
        Failure {
            message: self.message,
        }
    }
}

impl<C: FailureCode> FailureKind for CodedFailure<C> {
    fn message(&self) -> &str {
        &self.message
    }

    fn same_category(&self, other: &Self) -> bool {
        self.code() == other.code()
    }

    fn hash_category<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }

    #[track_caller]
    fn with_message(self, message: String) -> Self {
        match ensure_message(message) {
            Ok(message) => CodedFailure {
                codes: self.codes,
                message,
            },
            Err(violation) => panic!("{}", violation),
        }
    }
}

impl<C: FaultCode> FromFault for CodedFailure<C> {
    fn from_fault(fault: &Fault, prefix: &str) -> Self {
        CodedFailure::from_fault(fault, C::FAULT, prefix)
    }
}

impl<C: FailureCode> Semigroup for CodedFailure<C> {
    fn combine(self, other: Self) -> Self {
        CodedFailure {
            codes: self.codes.combine(other.codes),
            message: format!("{}\n{}", self.message, other.message),
        }
    }
}

impl<C> fmt::Display for CodedFailure<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<Failure> for String {
    fn from(failure: Failure) -> Self {
        failure.message
    }
}

impl TryFrom<String> for Failure {
    type Error = InvariantViolation;

    fn try_from(message: String) -> Result<Self, Self::Error> {
        Failure::try_new(message)
    }
}

impl TryFrom<&str> for Failure {
    type Error = InvariantViolation;

    fn try_from(message: &str) -> Result<Self, Self::Error> {
        Failure::try_new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Code {
        None,
        Io,
        Parse,
    }

    impl FailureCode for Code {
        const NONE: Self = Code::None;
    }

    impl FaultCode for Code {
        const FAULT: Self = Code::Io;
    }

    fn category_hash<F: FailureKind>(failure: &F) -> u64 {
        let mut hasher = DefaultHasher::new();
        failure.hash_category(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_failure_keeps_message() {
        let failure = Failure::new("boom");
        assert_eq!(failure.message(), "boom");
        assert_eq!(failure.to_string(), "boom");
        assert_eq!(String::from(failure), "boom");
    }

    #[test]
    #[should_panic(expected = "there must be an error message")]
    fn test_failure_rejects_empty_message() {
        let _ = Failure::new("");
    }

    #[test]
    fn test_try_new_reports_violation() {
        assert_eq!(Failure::try_new(""), Err(InvariantViolation::EmptyMessage));
        assert_eq!(Failure::try_from("ok").map(|f| f.into_message()), Ok("ok".to_string()));
    }

    #[test]
    fn test_failures_share_one_category() {
        let a = Failure::new("first");
        let b = Failure::new("second");
        assert!(a.same_category(&b));
        assert_eq!(category_hash(&a), category_hash(&b));
    }

    #[test]
    fn test_with_context_prefixes_message() {
        let failure = Failure::new("disk full").with_context("saving report");
        assert_eq!(failure.message(), "saving report\ndisk full");

        let untouched = Failure::new("disk full").with_context("");
        assert_eq!(untouched.message(), "disk full");
    }

    #[test]
    fn test_failure_combine_joins_messages() {
        let combined = Failure::new("a").combine(Failure::new("b"));
        assert_eq!(combined.message(), "a\nb");
    }

    #[test]
    fn test_coded_failure_defaults_message_to_code_name() {
        let failure = CodedFailure::new(Code::Parse);
        assert_eq!(failure.code(), Code::Parse);
        assert_eq!(failure.message(), "Parse");
    }

    #[test]
    #[should_panic(expected = "there must be an error code")]
    fn test_coded_failure_rejects_sentinel() {
        let _ = CodedFailure::new(Code::None);
    }

    #[test]
    fn test_coded_try_new_reports_sentinel() {
        assert_eq!(
            CodedFailure::try_new(Code::None, "msg"),
            Err(InvariantViolation::SentinelCode)
        );
    }

    #[test]
    fn test_coded_category_is_the_code() {
        let a = CodedFailure::with_message(Code::Io, "read failed");
        let b = CodedFailure::with_message(Code::Io, "write failed");
        let c = CodedFailure::with_message(Code::Parse, "read failed");

        assert!(a.same_category(&b));
        assert!(!a.same_category(&c));
        assert_eq!(category_hash(&a), category_hash(&b));
    }

    #[test]
    fn test_coded_with_message_keeps_codes() {
        let failure = CodedFailure::new(Code::Io).with_context("loading");
        assert_eq!(failure.code(), Code::Io);
        assert_eq!(failure.message(), "loading\nIo");
    }

    #[test]
    fn test_coded_combine_merges_codes_first_wins() {
        let merged =
            CodedFailure::new(Code::Parse).combine(CodedFailure::with_message(Code::Io, "io"));
        assert_eq!(merged.code(), Code::Parse);
        assert!(merged.codes().contains(Code::Io));
        assert_eq!(merged.message(), "Parse\nio");
    }

    #[test]
    fn test_coded_from_fault_uses_code_name_as_prefix() {
        let fault = Fault::msg("socket closed");
        let failure = CodedFailure::from_fault(&fault, Code::Io, "");
        assert!(failure.message().starts_with("Io\n"));
        assert!(failure.message().contains("socket closed"));

        let via_trait = <CodedFailure<Code> as FromFault>::from_fault(&fault, "");
        assert_eq!(via_trait.code(), Code::Io);
    }

    #[test]
    fn test_failure_from_fault_flattens_trace() {
        let fault = Fault::msg("outer").caused_by(Fault::msg("inner"));
        let failure = Failure::from_fault(&fault, "context");
        assert!(failure.message().starts_with("context\n"));
        assert!(failure.message().contains("Fault message: outer"));
        assert!(failure.message().contains("Fault message: inner"));
    }

    #[test]
    fn test_uncoded_keeps_message() {
        let failure = CodedFailure::with_message(Code::Parse, "bad token").uncoded();
        assert_eq!(failure.message(), "bad token");
    }
}
