//! Notification composition and delivery.
//!
//! `compose` renders the newly added identifiers into a `NotificationMessage`;
//! a `Notifier` delivers it. Delivery is best-effort from the monitor's point
//! of view: errors are returned so they can be logged, never to abort a run.

use crate::catalog::{IdentifierSet, ModelEntry, ModelMetadata};
use crate::error::NotifyError;
use crate::source::{http_agent, http_error_reason};
use serde_json::json;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;

pub const NOTIFICATION_HEADER: &str = "New models available:";

#[derive(Clone, Debug, Eq, PartialEq)]
/// Header line followed by one line per new model.
pub struct NotificationMessage {
    lines: Vec<String>,
}

impl NotificationMessage {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of model lines, excluding the header.
    pub fn entry_count(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Render `new_entries` in ascending identifier order.
///
/// Each line reads `display (identifier) - {url_base}/{slug}`. Identifiers
/// missing from `metadata` use the identifier-derived fallback.
pub fn compose(
    new_entries: &IdentifierSet,
    metadata: &ModelMetadata,
    url_base: &str,
) -> NotificationMessage {
    let base = url_base.trim_end_matches('/');
    let mut lines = Vec::with_capacity(new_entries.len() + 1);
    lines.push(NOTIFICATION_HEADER.to_string());
    for id in new_entries {
        let entry = match metadata.get(id) {
            Some(entry) => entry.clone(),
            None => {
                debug!("no metadata resolved for {id}; using fallback");
                ModelEntry::fallback(id)
            }
        };
        lines.push(format!(
            "{} ({}) - {}/{}",
            entry.display_name, id, base, entry.slug
        ));
    }
    NotificationMessage { lines }
}

/// Outbound delivery channel for a composed message.
pub trait Notifier {
    fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}

/// Prints the message to stdout; used when no webhook is configured.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{message}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Posts `{"text": message}` as JSON to a webhook URL.
pub struct WebhookNotifier {
    url: String,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: http_agent(timeout),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let body = json!({ "text": message.to_string() }).to_string();
        self.agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .send(body)
            .map_err(|err| match err {
                ureq::Error::StatusCode(status) => NotifyError::Status {
                    url: self.url.clone(),
                    status,
                },
                other => NotifyError::Transport {
                    url: self.url.clone(),
                    reason: http_error_reason(&other),
                },
            })?;
        debug!("webhook accepted notification");
        Ok(())
    }
}
