//! Lenient representation of the upstream catalog document.
//!
//! The catalog is JSON: either a bare array of records or an object carrying the
//! array under `data` (OpenRouter style) or `models`. Individual records are
//! decoded leniently so one malformed entry never takes the whole run down; only
//! a document without any record list is rejected outright.

use crate::catalog::identity::{IdentifierSet, ModelId};
use crate::error::ParseError;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// Keys probed, in order, when the document is an object.
const RECORD_LIST_KEYS: &[&str] = &["data", "models"];

// Values upstream tooling emits in place of a real slug.
const NULL_LIKE_SENTINELS: &[&str] = &["null", "none", "nil", "undefined"];

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    slug: Option<Value>,
    #[serde(default)]
    canonical_slug: Option<Value>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// One catalog entry with its optional fields already normalized.
///
/// `name` and `slug` are `None` when upstream omitted them or sent a blank or
/// null-like value; defaults are applied later by the metadata resolver.
pub struct ModelRecord {
    pub id: ModelId,
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl ModelRecord {
    /// Decode a single record, returning `None` when it carries no usable id.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let raw = RawRecord::deserialize(value).ok()?;
        let id = raw.id.as_ref().and_then(Value::as_str).and_then(ModelId::parse)?;
        let name = raw.name.as_ref().and_then(non_blank_text);
        let slug = [raw.slug.as_ref(), raw.canonical_slug.as_ref()]
            .into_iter()
            .flatten()
            .find_map(explicit_slug);
        Some(Self { id, name, slug })
    }
}

#[derive(Clone, Debug, Default)]
/// Records decoded from one fetched catalog document.
pub struct CatalogDocument {
    records: Vec<ModelRecord>,
    skipped: usize,
}

impl CatalogDocument {
    /// Parse raw catalog text.
    ///
    /// Invalid JSON and documents without a record list are errors. A valid
    /// list that yields no identifiers parses successfully; callers decide
    /// whether an empty catalog is acceptable.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(raw)?;
        let items = record_list(&value).ok_or(ParseError::MissingRecords)?;

        let mut records = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for (idx, item) in items.iter().enumerate() {
            match ModelRecord::from_value(item) {
                Some(record) => records.push(record),
                None => {
                    debug!("skipping catalog record {idx}: no usable identifier in {item}");
                    skipped += 1;
                }
            }
        }
        Ok(Self { records, skipped })
    }

    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    /// Number of entries dropped because they had no usable identifier.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The current identifier set described by this document.
    pub fn identifiers(&self) -> IdentifierSet {
        self.records.iter().map(|record| record.id.clone()).collect()
    }
}

fn record_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => RECORD_LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

fn non_blank_text(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

fn explicit_slug(value: &Value) -> Option<String> {
    let text = non_blank_text(value)?;
    if NULL_LIKE_SENTINELS
        .iter()
        .any(|sentinel| text.eq_ignore_ascii_case(sentinel))
    {
        return None;
    }
    Some(text)
}
