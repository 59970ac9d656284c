//! Access to the `*.txt` files of a GTFS feed, unpacked or zipped.

use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::warn;
use zip::ZipArchive;

use crate::error::ImportError;

/// A GTFS feed whose files can be read by name.
pub enum FeedArchive {
    Directory(PathBuf),
    Zip(ZipArchive<Cursor<Vec<u8>>>),
}

impl FeedArchive {
    /// Opens a local feed: a directory of text files or a zip archive.
    pub async fn open_path(path: &Path) -> Result<Self, ImportError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            return Ok(FeedArchive::Directory(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_zip_bytes(bytes)
    }

    pub fn from_zip_bytes(bytes: Vec<u8>) -> Result<Self, ImportError> {
        Ok(FeedArchive::Zip(ZipArchive::new(Cursor::new(bytes))?))
    }

    /// Reads `file_name` as text, or `None` when the feed lacks it.
    ///
    /// Zip entries match on their last path component, so feeds zipped
    /// together with their parent folder are accepted.
    pub fn read_file(&mut self, file_name: &str) -> Result<Option<String>, ImportError> {
        let bytes = match self {
            FeedArchive::Directory(dir) => {
                let path = dir.join(file_name);
                match std::fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                    Err(source) => return Err(ImportError::Io { path, source }),
                }
            }
            FeedArchive::Zip(archive) => {
                let entry_name = archive
                    .file_names()
                    .find(|name| name.rsplit('/').next() == Some(file_name))
                    .map(str::to_string);

                let Some(entry_name) = entry_name else {
                    return Ok(None);
                };

                let mut entry = archive.by_name(&entry_name)?;
                let mut bytes = Vec::new();
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|source| ImportError::Io {
                        path: PathBuf::from(&entry_name),
                        source,
                    })?;
                bytes
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = text {
            warn!(file = file_name, "Replaced invalid UTF-8 in feed file");
        }
        Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
    }
}
