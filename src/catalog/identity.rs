use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque identifier of one catalog entry (e.g., `openai/gpt-4o`).
///
/// Identifiers are compared byte-wise; the derived `Ord` gives the ascending
/// order used for persistence and notification output.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    /// Build an identifier from raw text.
    ///
    /// Rejects empty or whitespace-only input, and input containing a line
    /// break: the baseline stores one identifier per line.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if !is_storable(trimmed) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_storable(text: &str) -> bool {
    !text.trim().is_empty() && !text.contains(['\n', '\r'])
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sorted, duplicate-free set of model identifiers.
///
/// Values are built once (from a catalog document or a baseline file) and then
/// replaced wholesale; there is no API for mutating a set in place.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierSet(BTreeSet<ModelId>);

impl IdentifierSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.0.contains(id)
    }

    /// Iterates identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelId> {
        self.0.iter()
    }

    /// Identifiers present in `self` but absent from `other`.
    pub fn difference(&self, other: &IdentifierSet) -> IdentifierSet {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl FromIterator<ModelId> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = ModelId>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|id| is_storable(&id.0)).collect())
    }
}

impl<'a> FromIterator<&'a str> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().filter_map(ModelId::parse).collect())
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a ModelId;
    type IntoIter = std::collections::btree_set::Iter<'a, ModelId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
