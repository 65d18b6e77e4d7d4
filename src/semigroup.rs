//! Associative combination of failure payloads.
//!
//! When two independent steps both fail, [`Outcome::and`](crate::Outcome::and)
//! keeps both failures by combining their payloads instead of dropping one.
//! [`Failure`](crate::Failure) joins messages line by line,
//! [`CodedFailure`](crate::CodedFailure) also merges its codes and
//! [`CodeSet`](crate::CodeSet) takes the ordered union.
//!
//! # Examples
//!
//! ```
//! use upshot::{Failure, Semigroup};
//!
//! let combined = Failure::new("name is empty").combine(Failure::new("age is negative"));
//! assert_eq!(combined.message(), "name is empty\nage is negative");
//! ```

/// A type that supports an associative binary operation
///
/// # Laws
///
/// Implementations must satisfy the associativity law:
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{CodedFailure, FailureCode};
    use crate::{Failure, Outcome};
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Code {
        None,
        Io,
        Parse,
    }

    impl FailureCode for Code {
        const NONE: Self = Code::None;
    }

    #[test]
    fn test_and_combines_both_failures() {
        let both = Outcome::<u8>::failure("left").and(Outcome::<u8>::failure("right"));
        assert_eq!(both.error_message(), "left\nright");
    }

    #[test]
    fn test_coded_combine_is_left_biased() {
        let merged = CodedFailure::new(Code::Io).combine(CodedFailure::new(Code::Parse));
        assert_eq!(merged.code(), Code::Io);
        assert_eq!(merged.codes().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_failure_combine_associative(
            a in "[a-z]{1,8}",
            b in "[a-z]{1,8}",
            c in "[a-z]{1,8}",
        ) {
            let left = Failure::new(a.clone())
                .combine(Failure::new(b.clone()))
                .combine(Failure::new(c.clone()));
            let right = Failure::new(a)
                .combine(Failure::new(b).combine(Failure::new(c)));
            prop_assert_eq!(left.message(), right.message());
        }
    }
}
