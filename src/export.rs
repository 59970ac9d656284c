//! Per-agency export directories and the documents written into them.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::formatters::sanitize_file_name;

/// Owns the export root and the per-agency directories below it.
#[derive(Debug, Clone)]
pub struct ExportManager {
    root: PathBuf,
}

impl ExportManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the export for `agency_key`.
    pub fn agency_path(&self, agency_key: &str) -> PathBuf {
        self.root.join(sanitize_file_name(agency_key))
    }

    /// Deletes the agency's directory (if any) and recreates it empty.
    pub async fn reset_export_directory(&self, agency_key: &str) -> Result<PathBuf> {
        let path = self.agency_path(agency_key);

        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed previous export"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&path, e)),
        }

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| Error::io(&path, e))?;

        Ok(path)
    }

    /// Writes `content` verbatim to `dir/filename`, replacing any existing file.
    pub async fn write_document(&self, dir: &Path, filename: &str, content: &str) -> Result<()> {
        let path = dir.join(sanitize_file_name(filename));
        debug!(path = %path.display(), bytes = content.len(), "Writing export file");

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| Error::io(&path, e))
    }
}
