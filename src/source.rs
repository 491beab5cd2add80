//! Catalog sources.
//!
//! A `CatalogSource` hands back the raw catalog text or a `FetchError`. The
//! HTTP source makes exactly one timeout-bounded request per call; retries are
//! left to the external scheduler invoking the next run.

use crate::error::FetchError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Upstream provider of the raw catalog document.
pub trait CatalogSource {
    fn fetch(&self) -> Result<String, FetchError>;

    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}

/// Fetches the catalog with a single HTTP GET.
pub struct HttpCatalogSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: http_agent(timeout),
        }
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch(&self) -> Result<String, FetchError> {
        info!("requesting catalog from {}", self.url);
        let response = self
            .agent
            .get(&self.url)
            .header("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::StatusCode(status) => FetchError::Status {
                    url: self.url.clone(),
                    status,
                },
                other => FetchError::Transport {
                    url: self.url.clone(),
                    reason: http_error_reason(&other),
                },
            })?;

        response
            .into_body()
            .read_to_string()
            .map_err(|err| FetchError::Body {
                url: self.url.clone(),
                reason: http_error_reason(&err),
            })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the catalog from a local file.
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalogSource {
    fn fetch(&self) -> Result<String, FetchError> {
        info!("reading catalog from {}", self.path.display());
        fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Where the catalog comes from, parsed from a URL or path string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogLocation {
    Http(String),
    File(PathBuf),
}

impl CatalogLocation {
    /// `http://` and `https://` values are remote; `file://` and anything else
    /// is treated as a local path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if has_scheme(trimmed, "http://") || has_scheme(trimmed, "https://") {
            return CatalogLocation::Http(trimmed.to_string());
        }
        let path = if has_scheme(trimmed, "file://") {
            &trimmed["file://".len()..]
        } else {
            trimmed
        };
        CatalogLocation::File(PathBuf::from(path))
    }

    /// Build the matching source; `timeout` only applies to HTTP.
    pub fn into_source(self, timeout: Duration) -> Box<dyn CatalogSource> {
        match self {
            CatalogLocation::Http(url) => Box::new(HttpCatalogSource::new(url, timeout)),
            CatalogLocation::File(path) => Box::new(FileCatalogSource::new(path)),
        }
    }
}

/// Case-insensitive scheme prefix check.
fn has_scheme(value: &str, scheme: &str) -> bool {
    value
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

/// Agent whose global timeout bounds the whole request, body included.
pub(crate) fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

pub(crate) fn http_error_reason(err: &ureq::Error) -> String {
    match err {
        ureq::Error::Timeout(_) => format!("timed out ({err})"),
        other => other.to_string(),
    }
}
