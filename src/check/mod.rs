//! The consistency checker (spec.md §4.4): pure, read-only predicates over
//! identifiers, type assignability and CFG well-formedness.
//!
//! Per spec.md §7, nothing here ever panics or returns an `Err` — a false
//! result (or, for [`ConsistencyChecker::check_wellformed`], a
//! [`WellformednessIssue`]) is how an ill-formed *program* is reported; it is
//! the caller's decision whether to continue.

mod wellformed;

use std::collections::HashSet;
use std::hash::Hash;

use regex::Regex;

use crate::ast::Typ;
use crate::cfg::Cfg;

pub use wellformed::WellformednessIssue;

/// `sameLength(a, b)` (spec.md §4.4).
pub fn same_length<A, B>(a: &[A], b: &[B]) -> bool {
    a.len() == b.len()
}

/// `noDuplicates(a)` (spec.md §4.4).
pub fn no_duplicates<T: Eq + Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item))
}

/// `isAssignable(a, b)` (spec.md §4.4), delegated to [`Typ`]'s own notion of
/// assignability.
pub fn is_assignable(value: &Typ, target: &Typ) -> bool {
    value.is_assignable(target)
}

/// `areAssignable(as, bs)` (spec.md §4.4): the zipped lifting of
/// [`is_assignable`], requiring equal arity.
pub fn are_assignable(values: &[Typ], targets: &[Typ]) -> bool {
    same_length(values, targets) && values.iter().zip(targets).all(|(v, t)| v.is_assignable(t))
}

/// Holds the two things spec.md §6 says the parser contributes: the set of
/// reserved words and the regular expression defining a valid identifier.
/// Everything else in this module is a free function because it needs no
/// configuration.
pub struct ConsistencyChecker {
    identifier_re: Regex,
    reserved_words: HashSet<String>,
}

/// A conservative default matching common ASCII-identifier syntax; real
/// callers are expected to supply the parser's own regex via
/// [`ConsistencyChecker::new`] (spec.md §6).
const DEFAULT_IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_$]*$";

impl Default for ConsistencyChecker {
    fn default() -> Self {
        ConsistencyChecker::new(DEFAULT_IDENTIFIER_PATTERN, std::iter::empty())
    }
}

impl ConsistencyChecker {
    pub fn new(
        identifier_regex: &str,
        reserved_words: impl IntoIterator<Item = String>,
    ) -> ConsistencyChecker {
        ConsistencyChecker {
            identifier_re: Regex::new(identifier_regex)
                .expect("parser-supplied identifier regex must be valid"),
            reserved_words: reserved_words.into_iter().collect(),
        }
    }

    /// `validIdentifier(name)` (spec.md §4.4).
    pub fn valid_identifier(&self, name: &str) -> bool {
        self.identifier_re.is_match(name)
    }

    /// `validUserDefinedIdentifier(name)` (spec.md §4.4): also rejects
    /// reserved words.
    pub fn valid_user_defined_identifier(&self, name: &str) -> bool {
        self.valid_identifier(name) && !self.reserved_words.contains(name)
    }

    /// `isWellformedCfg(entry)` (spec.md §4.4): true iff `cfg` satisfies
    /// I1-I5.
    pub fn is_wellformed_cfg(&self, cfg: &Cfg) -> bool {
        self.check_wellformed(cfg).is_ok()
    }

    /// The extended form mentioned in spec.md §7 ("in extended form, a
    /// reason"): the same check as [`Self::is_wellformed_cfg`], but reporting
    /// which invariant failed.
    pub fn check_wellformed(&self, cfg: &Cfg) -> Result<(), WellformednessIssue> {
        wellformed::check(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_duplicates_detects_a_repeat() {
        assert!(no_duplicates(&["a", "b", "c"]));
        assert!(!no_duplicates(&["a", "b", "a"]));
    }

    #[test]
    fn are_assignable_requires_matching_arity() {
        assert!(!are_assignable(&[Typ::Int], &[Typ::Int, Typ::Bool]));
        assert!(are_assignable(&[Typ::Int, Typ::Bool], &[Typ::Int, Typ::Bool]));
    }

    #[test]
    fn reserved_words_are_rejected_only_for_user_defined_identifiers() {
        let checker = ConsistencyChecker::new(
            DEFAULT_IDENTIFIER_PATTERN,
            ["result".to_string(), "this".to_string()],
        );
        assert!(checker.valid_identifier("result"));
        assert!(!checker.valid_user_defined_identifier("result"));
        assert!(checker.valid_user_defined_identifier("x"));
        assert!(!checker.valid_identifier("1leading_digit"));
    }
}
