//! Persisted "last seen" identifier set.
//!
//! The baseline is a plain text file: one identifier per line, sorted
//! ascending, newline terminated. Writes go through a temporary file in the
//! same directory followed by a rename, so readers (including a later run after
//! a crash) see either the previous baseline or the new one, never a mix.

use crate::catalog::IdentifierSet;
use crate::error::StorageError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Clone, Debug)]
/// File-backed store for the baseline identifier set.
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored baseline.
    ///
    /// A missing file is `Ok(None)` (first run). A file that exists but cannot
    /// be read or decoded is a `StorageError`. Blank lines are ignored, so an
    /// empty file loads as an empty set.
    pub fn load(&self) -> Result<Option<IdentifierSet>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no baseline at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let text = String::from_utf8(bytes).map_err(|_| StorageError::Encoding {
            path: self.path.clone(),
        })?;
        Ok(Some(text.lines().collect()))
    }

    /// Atomically replace the stored baseline with `ids`.
    pub fn save(&self, ids: &IdentifierSet) -> Result<(), StorageError> {
        self.write_atomically(&render(ids))
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "wrote {} identifiers to {}",
            ids.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_atomically(&self, contents: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

fn render(ids: &IdentifierSet) -> String {
    let mut out = String::new();
    for id in ids {
        out.push_str(id.as_str());
        out.push('\n');
    }
    out
}
