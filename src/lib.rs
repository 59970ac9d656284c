//! Builds per-agency route and stop JSON documents from GTFS feeds.

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod formatters;
pub mod infra;
pub mod logging;
pub mod pipeline;
pub mod reporter;
pub mod routes;
pub mod services;
pub mod stats;

pub use config::{AgencyDescriptor, Config};
pub use error::{Error, ImportError, Result};
pub use pipeline::{AgencyReport, gtfs_to_json, run};
