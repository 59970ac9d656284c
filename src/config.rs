//! Run configuration, loaded from a JSON file.
//!
//! ```json
//! {
//!   "agencies": [
//!     { "agencyKey": "metro", "url": "https://example.com/gtfs.zip" },
//!     { "agencyKey": "ferry", "path": "./feeds/ferry.zip" }
//!   ],
//!   "sqlitePath": "./gtfs.db",
//!   "skipImport": false,
//!   "verbose": true,
//!   "exportPath": "json"
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::formatters::sanitize_file_name;
use crate::logging::{LogFn, RunLogger};

/// One configured transit operator and where its feed comes from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDescriptor {
    #[serde(alias = "agency_key")]
    pub agency_key: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Extra HTTP headers sent when downloading `url`.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl AgencyDescriptor {
    /// The feed reference recorded in `log.txt`: the URL when present, else the path.
    pub fn source(&self) -> Option<&str> {
        self.url.as_deref().or(self.path.as_deref())
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub agencies: Vec<AgencyDescriptor>,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    #[serde(default)]
    pub skip_import: bool,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Root under which each agency gets its own export directory.
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    /// Replaces default console output for narrative lines and hides the stats table.
    #[serde(skip)]
    pub log_function: Option<LogFn>,
}

fn default_sqlite_path() -> String {
    ":memory:".to_string()
}

fn default_verbose() -> bool {
    true
}

fn default_export_path() -> PathBuf {
    PathBuf::from("json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agencies: Vec::new(),
            sqlite_path: default_sqlite_path(),
            skip_import: false,
            verbose: default_verbose(),
            export_path: default_export_path(),
            log_function: None,
        }
    }
}

impl Config {
    /// Reads and parses the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Checks the agency list before any agency is processed.
    pub fn validate(&self) -> Result<()> {
        if self.agencies.is_empty() {
            return Err(Error::Config("no agencies configured".to_string()));
        }

        let mut seen = HashSet::new();
        for agency in &self.agencies {
            let dir_name = sanitize_file_name(&agency.agency_key);
            if dir_name.is_empty() {
                return Err(Error::Config(format!(
                    "invalid agencyKey `{}`",
                    agency.agency_key
                )));
            }

            // Keys sharing an export directory would wipe each other's output.
            if !seen.insert(dir_name) {
                return Err(Error::Config(format!(
                    "duplicate agencyKey `{}`",
                    agency.agency_key
                )));
            }

            if !self.skip_import && agency.source().is_none() {
                return Err(Error::Config(format!(
                    "agency `{}` needs a url or a path",
                    agency.agency_key
                )));
            }
        }

        Ok(())
    }

    pub fn logger(&self) -> RunLogger {
        RunLogger::new(self.verbose, self.log_function.clone())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("agencies", &self.agencies)
            .field("sqlite_path", &self.sqlite_path)
            .field("skip_import", &self.skip_import)
            .field("verbose", &self.verbose)
            .field("export_path", &self.export_path)
            .field("log_function", &self.log_function.is_some())
            .finish()
    }
}
