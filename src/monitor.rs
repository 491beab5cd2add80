//! One monitor run: fetch, reconcile, notify, persist.
//!
//! The run is strictly linear. The baseline is written last and only after a
//! non-empty catalog was obtained, so a failed fetch or a broken upstream
//! payload never replaces a good baseline. A failed notification does not stop
//! the baseline from advancing; otherwise the same entries would be reported
//! again on every following run.

use crate::baseline::BaselineStore;
use crate::catalog::{CatalogDocument, IdentifierSet, MetadataResolver};
use crate::error::{MonitorError, ParseError};
use crate::notify::{Notifier, compose};
use crate::reconcile::reconcile;
use crate::source::CatalogSource;
use serde::Serialize;
use tracing::{debug, info, warn};

/// How a successful run ended.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No usable baseline existed; the current set became the baseline.
    Initialized { tracked: usize },
    /// Nothing new since the baseline; the baseline was rewritten as-is.
    Unchanged { tracked: usize },
    /// New entries were found and handed to the notifier.
    Notified {
        added: IdentifierSet,
        delivered: bool,
    },
}

/// Wires the collaborators for a single run.
pub struct Monitor<'a> {
    source: &'a dyn CatalogSource,
    notifier: &'a dyn Notifier,
    store: &'a BaselineStore,
    url_base: &'a str,
}

impl<'a> Monitor<'a> {
    pub fn new(
        source: &'a dyn CatalogSource,
        notifier: &'a dyn Notifier,
        store: &'a BaselineStore,
        url_base: &'a str,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            url_base,
        }
    }

    pub fn run(&self) -> Result<RunOutcome, MonitorError> {
        let raw = self.source.fetch()?;
        let document = CatalogDocument::parse(&raw)?;
        if document.skipped() > 0 {
            warn!(
                "skipped {} catalog records without a usable identifier",
                document.skipped()
            );
        }
        let current = document.identifiers();
        if current.is_empty() {
            return Err(ParseError::EmptyCatalog.into());
        }
        info!(
            "catalog from {} lists {} models",
            self.source.describe(),
            current.len()
        );

        let previous = match self.store.load() {
            Ok(Some(previous)) if !previous.is_empty() => previous,
            Ok(Some(_)) => {
                info!(
                    "baseline {} is empty; reinitializing",
                    self.store.path().display()
                );
                return self.initialize(&current);
            }
            Ok(None) => {
                info!(
                    "no baseline at {}; initializing",
                    self.store.path().display()
                );
                return self.initialize(&current);
            }
            Err(err) => {
                warn!("{err}; reinitializing baseline");
                return self.initialize(&current);
            }
        };

        let added = reconcile(&current, &previous);
        if added.is_empty() {
            debug!("no new models since last run");
            self.store.save(&current)?;
            return Ok(RunOutcome::Unchanged {
                tracked: current.len(),
            });
        }

        info!("{} new models since last run", added.len());
        let metadata = MetadataResolver::resolve(&document);
        let message = compose(&added, &metadata, self.url_base);
        let delivered = match self.notifier.notify(&message) {
            Ok(()) => true,
            Err(err) => {
                warn!("notification failed: {err}");
                false
            }
        };

        self.store.save(&current)?;
        Ok(RunOutcome::Notified { added, delivered })
    }

    fn initialize(&self, current: &IdentifierSet) -> Result<RunOutcome, MonitorError> {
        self.store.save(current)?;
        Ok(RunOutcome::Initialized {
            tracked: current.len(),
        })
    }
}
