//! Shared library for the modelwatch catalog monitor.
//!
//! One invocation performs one monitor run: fetch the upstream model catalog,
//! compare its identifiers with the baseline persisted by the previous run,
//! announce anything new, then persist the current set. Scheduling is external
//! (cron, systemd timers, CI); nothing here keeps a process alive between runs.
//!
//! The public surface is split by concern: `catalog` parses documents and
//! resolves display metadata, `baseline` owns the on-disk state, `reconcile`
//! computes additions, `notify` composes and delivers messages, `source` fetches
//! catalogs, and `monitor` sequences a run.

pub mod baseline;
pub mod catalog;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod reconcile;
pub mod source;

pub use baseline::BaselineStore;
pub use catalog::{
    CatalogDocument, IdentifierSet, MetadataResolver, ModelEntry, ModelId, ModelMetadata,
    ModelRecord, derive_slug,
};
pub use config::{Cli, CliAction, CliOverrides, MonitorConfig};
pub use error::{FetchError, MonitorError, NotifyError, ParseError, StorageError};
pub use monitor::{Monitor, RunOutcome};
pub use notify::{NotificationMessage, Notifier, StdoutNotifier, WebhookNotifier, compose};
pub use reconcile::reconcile;
pub use source::{CatalogLocation, CatalogSource, FileCatalogSource, HttpCatalogSource};
