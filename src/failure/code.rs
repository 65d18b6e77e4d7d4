//! Enumerated failure categories.
//!
//! A failure code is a small, caller-defined enum. One member is the
//! "no error" sentinel ([`FailureCode::NONE`]); every other member names a
//! kind of failure.
//!
//! Codes are never combined through their numeric encoding. When two coded
//! failures meet, their codes are collected into a [`CodeSet`], and the caller
//! decides how to pick a representative: [`CodeSet::first`] (the order in which
//! the failures happened) or [`CodeSet::most_severe`].

use std::fmt;
use std::hash::Hash;

use crate::semigroup::Semigroup;

/// A closed set of symbolic failure codes.
///
/// # Examples
///
/// ```
/// use upshot::FailureCode;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum DbError {
///     None,
///     NotFound,
///     Timeout,
/// }
///
/// impl FailureCode for DbError {
///     const NONE: Self = DbError::None;
///
///     fn severity(&self) -> u8 {
///         match self {
///             DbError::None => 0,
///             DbError::NotFound => 1,
///             DbError::Timeout => 2,
///         }
///     }
/// }
///
/// assert!(DbError::None.is_none());
/// assert_eq!(DbError::Timeout.name(), "Timeout");
/// ```
pub trait FailureCode: Copy + Eq + Hash + fmt::Debug {
    /// The sentinel meaning "no error".
    const NONE: Self;

    /// Returns `true` for the sentinel.
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Symbolic name, used as the failure message when none is given.
    fn name(&self) -> String {
        format!("{:?}", self)
    }

    /// Relative severity; higher is worse.
    fn severity(&self) -> u8 {
        0
    }
}

/// A failure code that can stand for a caught fault.
///
/// Implementing this lets the try/catch and retry combinators build coded
/// failures from faults without a caller-supplied handler.
pub trait FaultCode: FailureCode {
    /// Code recorded when a caught fault is converted into a failure.
    const FAULT: Self;
}

/// Insertion-ordered set of non-sentinel failure codes.
///
/// # Examples
///
/// ```
/// use upshot::{CodeSet, FailureCode, Semigroup};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Code { None, Io, Parse }
///
/// impl FailureCode for Code {
///     const NONE: Self = Code::None;
/// }
///
/// let left = CodeSet::single(Code::Parse);
/// let right = CodeSet::single(Code::Io).with(Code::Parse);
///
/// let merged = left.combine(right);
/// assert_eq!(merged.first(), Some(Code::Parse));
/// assert_eq!(merged.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeSet<C> {
    codes: Vec<C>,
}

impl<C: FailureCode> CodeSet<C> {
    /// An empty set.
    pub fn new() -> Self {
        CodeSet { codes: Vec::new() }
    }

    /// A set holding one code (the sentinel is ignored).
    pub fn single(code: C) -> Self {
        CodeSet::new().with(code)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, code: C) -> Self {
        self.insert(code);
        self
    }

    /// Add a code. Returns `false` if it was already present or is the sentinel.
    pub fn insert(&mut self, code: C) -> bool {
        if code.is_none() || self.codes.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Add every code of `other` that is not already present, keeping order.
    pub fn union(mut self, other: CodeSet<C>) -> Self {
        for code in other.codes {
            self.insert(code);
        }
        self
    }

    /// Returns `true` if `code` is in the set.
    pub fn contains(&self, code: C) -> bool {
        self.codes.contains(&code)
    }

    /// The earliest inserted code.
    pub fn first(&self) -> Option<C> {
        self.codes.first().copied()
    }

    /// The code with the highest [`severity`](FailureCode::severity).
    ///
    /// Ties go to the earliest inserted code.
    pub fn most_severe(&self) -> Option<C> {
        self.codes
            .iter()
            .copied()
            .fold(None, |best: Option<C>, code| match best {
                Some(b) if b.severity() >= code.severity() => Some(b),
                _ => Some(code),
            })
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no code has been recorded.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = C> + '_ {
        self.codes.iter().copied()
    }
}

impl<C: FailureCode> Default for CodeSet<C> {
    fn default() -> Self {
        CodeSet::new()
    }
}

impl<C: FailureCode> Semigroup for CodeSet<C> {
    fn combine(self, other: Self) -> Self {
        self.union(other)
    }
}

impl<C: FailureCode> FromIterator<C> for CodeSet<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut set = CodeSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Code {
        None,
        Io,
        Parse,
        Fatal,
    }

    impl FailureCode for Code {
        const NONE: Self = Code::None;

        fn severity(&self) -> u8 {
            match self {
                Code::None => 0,
                Code::Io => 1,
                Code::Parse => 1,
                Code::Fatal => 9,
            }
        }
    }

    #[test]
    fn test_name_defaults_to_debug() {
        assert_eq!(Code::Parse.name(), "Parse");
    }

    #[test]
    fn test_sentinel_is_never_inserted() {
        let mut set = CodeSet::new();
        assert!(!set.insert(Code::None));
        assert!(set.is_empty());
        assert!(CodeSet::single(Code::None).is_empty());
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut set = CodeSet::single(Code::Io);
        assert!(!set.insert(Code::Io));
        assert!(set.insert(Code::Parse));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Code::Io, Code::Parse]);
    }

    #[test]
    fn test_first_and_most_severe() {
        let set: CodeSet<Code> = [Code::Io, Code::Fatal, Code::Parse].into_iter().collect();
        assert_eq!(set.first(), Some(Code::Io));
        assert_eq!(set.most_severe(), Some(Code::Fatal));
    }

    #[test]
    fn test_most_severe_tie_keeps_earliest() {
        let set = CodeSet::single(Code::Parse).with(Code::Io);
        assert_eq!(set.most_severe(), Some(Code::Parse));
    }

    #[test]
    fn test_empty_set_has_no_representative() {
        let set: CodeSet<Code> = CodeSet::default();
        assert_eq!(set.first(), None);
        assert_eq!(set.most_severe(), None);
    }

    fn code_strategy() -> impl Strategy<Value = Code> {
        prop_oneof![
            Just(Code::None),
            Just(Code::Io),
            Just(Code::Parse),
            Just(Code::Fatal),
        ]
    }

    fn set_strategy() -> impl Strategy<Value = CodeSet<Code>> {
        prop::collection::vec(code_strategy(), 0..6).prop_map(|v| v.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_combine_is_associative(a in set_strategy(), b in set_strategy(), c in set_strategy()) {
            let left = a.clone().combine(b.clone()).combine(c.clone());
            let right = a.combine(b.combine(c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_union_never_contains_sentinel(a in set_strategy(), b in set_strategy()) {
            prop_assert!(!a.union(b).contains(Code::None));
        }
    }
}
