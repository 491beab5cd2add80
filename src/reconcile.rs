//! Baseline reconciliation.

use crate::catalog::IdentifierSet;

/// Identifiers present in `current` but absent from `previous`.
///
/// Pure set difference; callers handle the empty-previous (initialization) and
/// empty-current (upstream breakage) cases before getting here.
pub fn reconcile(current: &IdentifierSet, previous: &IdentifierSet) -> IdentifierSet {
    current.difference(previous)
}
