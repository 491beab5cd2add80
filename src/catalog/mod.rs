//! Model catalog wiring.
//!
//! This module wraps the JSON document served by the upstream catalog so the
//! monitor can extract the current identifier set and resolve display metadata
//! from the same parse. `identity` holds the value types that get persisted;
//! `model` decodes records; `metadata` applies the naming and slug fallbacks.

pub mod identity;
pub mod metadata;
pub mod model;

pub use identity::{IdentifierSet, ModelId};
pub use metadata::{MetadataResolver, ModelEntry, ModelMetadata, derive_slug};
pub use model::{CatalogDocument, ModelRecord};
