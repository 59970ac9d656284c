//! Error types for the JSON export pipeline.

use std::path::PathBuf;

/// Errors that abort a run.
///
/// None of these are retried: the first failure stops processing of the
/// remaining agencies and is surfaced to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration, detected before any agency runs.
    #[error("configuration error: {0}")]
    Config(String),

    /// The feed for an agency could not be imported.
    #[error("import failed for agency `{agency_key}`: {source}")]
    Import {
        agency_key: String,
        #[source]
        source: ImportError,
    },

    /// A query against the relational store failed.
    #[error("store query failed: {0}")]
    Store(#[from] rusqlite::Error),

    /// A file system operation on an export directory failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Route data could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while reading a GTFS feed into the store.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("invalid feed URL `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("download of {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("feed is missing required file {0}")]
    MissingFile(String),

    #[error("agency has neither a url nor a path to import from")]
    NoSource,

    #[error("failed to load rows into the store: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
