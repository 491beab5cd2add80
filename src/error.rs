//! Failure taxonomy for a monitor run.
//!
//! Each collaborator reports its own error kind so the caller decides what is
//! fatal: fetch and parse failures abort the run, a baseline read failure is a
//! reset signal, and delivery failures are only logged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The catalog document could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("catalog request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed reading catalog response body from {url}: {reason}")]
    Body { url: String, reason: String },
    #[error("failed reading catalog file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The catalog document was obtained but yielded no usable identifiers.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("catalog document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog document has no record list (expected an array, or an object with `data` or `models`)")]
    MissingRecords,
    #[error("catalog document contained no model identifiers")]
    EmptyCatalog,
}

/// The persisted baseline could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed reading baseline {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed writing baseline {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("baseline {} is not valid UTF-8", .path.display())]
    Encoding { path: PathBuf },
}

/// The notification could not be delivered.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("notification request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed writing notification: {0}")]
    Io(#[from] io::Error),
}

/// Failures that end a run without advancing the baseline.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
