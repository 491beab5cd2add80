//! Identifier to display-metadata resolution.
//!
//! `MetadataResolver` turns the records of one catalog document into an
//! immutable `ModelMetadata` map. Resolution is total: any identifier, even one
//! the document never mentioned, gets a display name and slug through the same
//! fallback rules used for sparse records.

use crate::catalog::identity::ModelId;
use crate::catalog::model::{CatalogDocument, ModelRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Lowercase `id` and replace every character outside `[a-z0-9_.-]` with `-`.
pub fn derive_slug(id: &str) -> String {
    id.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// Display metadata for one model.
pub struct ModelEntry {
    pub display_name: String,
    pub slug: String,
}

impl ModelEntry {
    /// Entry used when nothing but the identifier is known.
    pub fn fallback(id: &ModelId) -> Self {
        Self {
            display_name: id.0.clone(),
            slug: derive_slug(&id.0),
        }
    }

    fn from_record(record: &ModelRecord) -> Self {
        Self {
            display_name: record.name.clone().unwrap_or_else(|| record.id.0.clone()),
            slug: record
                .slug
                .clone()
                .unwrap_or_else(|| derive_slug(&record.id.0)),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Immutable identifier to metadata map built once per run.
pub struct ModelMetadata {
    by_id: BTreeMap<ModelId, ModelEntry>,
}

impl ModelMetadata {
    /// Resolved entry for `id`, if the document described it.
    pub fn get(&self, id: &ModelId) -> Option<&ModelEntry> {
        self.by_id.get(id)
    }

    /// Resolved entry for `id`, or the fallback derived from the id itself.
    pub fn entry_for(&self, id: &ModelId) -> ModelEntry {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| ModelEntry::fallback(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Builds `ModelMetadata` from a parsed catalog document.
pub struct MetadataResolver;

impl MetadataResolver {
    /// Resolve every record in `document`.
    ///
    /// When an identifier appears more than once, the first record that
    /// supplies a field wins for that field.
    pub fn resolve(document: &CatalogDocument) -> ModelMetadata {
        let mut merged: BTreeMap<ModelId, ModelRecord> = BTreeMap::new();
        for record in document.records() {
            match merged.get_mut(&record.id) {
                Some(existing) => {
                    debug!("catalog lists {} more than once", record.id);
                    if existing.name.is_none() {
                        existing.name = record.name.clone();
                    }
                    if existing.slug.is_none() {
                        existing.slug = record.slug.clone();
                    }
                }
                None => {
                    merged.insert(record.id.clone(), record.clone());
                }
            }
        }

        let by_id = merged
            .into_iter()
            .map(|(id, record)| (id, ModelEntry::from_record(&record)))
            .collect();
        ModelMetadata { by_id }
    }
}
