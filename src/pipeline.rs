//! Runs the JSON export for every configured agency, strictly in order.
//!
//! For each agency: optional import, export directory reset, route
//! building, then `<agencyKey>.json` and `log.txt` are written and the
//! counters reported. Any failure aborts the run; directories already
//! reset are left as they are.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use tracing::debug;

use crate::config::{AgencyDescriptor, Config};
use crate::error::Result;
use crate::export::ExportManager;
use crate::formatters::{elapsed_seconds, sanitize_file_name};
use crate::infra::sqlite::Store;
use crate::logging::RunLogger;
use crate::reporter::{generate_log_text, stats_table};
use crate::routes::{AgencyRoutes, build_agency_routes};
use crate::services::feed_importer::{FeedImporter, ImportRequest};
use crate::services::route_source::RouteSource;
use crate::stats::RunStats;

/// Version recorded in every `log.txt`.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of one agency's export.
#[derive(Debug, Clone)]
pub struct AgencyReport {
    pub agency_key: String,
    pub export_path: PathBuf,
    pub stats: RunStats,
    pub elapsed_secs: u64,
}

/// Opens the configured store and exports every agency.
pub async fn run(config: &Config, importer: &dyn FeedImporter) -> Result<Vec<AgencyReport>> {
    let mut store = Store::open(&config.sqlite_path)?;
    gtfs_to_json(config, &mut store, importer).await
}

/// Exports every agency against an already opened store.
pub async fn gtfs_to_json(
    config: &Config,
    store: &mut Store,
    importer: &dyn FeedImporter,
) -> Result<Vec<AgencyReport>> {
    config.validate()?;

    let logger = config.logger();
    let exports = ExportManager::new(&config.export_path);

    logger.log(&format!(
        "Started JSON creation for {} agencies.",
        config.agencies.len()
    ));

    let mut reports = Vec::with_capacity(config.agencies.len());
    for agency in &config.agencies {
        let report = export_agency(agency, config, store, importer, &exports, &logger).await?;
        reports.push(report);
    }

    Ok(reports)
}

#[tracing::instrument(skip_all, fields(agency_key = %agency.agency_key))]
async fn export_agency(
    agency: &AgencyDescriptor,
    config: &Config,
    store: &mut Store,
    importer: &dyn FeedImporter,
    exports: &ExportManager,
    logger: &RunLogger,
) -> Result<AgencyReport> {
    let started = Instant::now();
    let agency_key = agency.agency_key.as_str();

    if config.skip_import {
        debug!("Import skipped");
    } else {
        importer
            .import_feed(store, &ImportRequest::new(agency))
            .await?;
    }

    let export_path = exports.reset_export_directory(agency_key).await?;
    logger.log(&format!("Starting JSON creation for {agency_key}"));

    let AgencyRoutes { routes, stats } = build_agency_routes(agency_key, &*store)?;
    if routes.is_empty() {
        logger.warn(&format!("No routes found for {agency_key}"));
    }

    let json = serde_json::to_string_pretty(&routes)?;
    let json_name = format!("{}.json", sanitize_file_name(agency_key));
    exports.write_document(&export_path, &json_name, &json).await?;

    let feed_version = store.feed_version()?;
    let log_text = generate_log_text(
        agency,
        &stats,
        feed_version.as_deref(),
        TOOL_VERSION,
        &Local::now(),
    );
    exports.write_document(&export_path, "log.txt", &log_text).await?;

    let elapsed_secs = elapsed_seconds(started.elapsed());

    let shown_path = std::path::absolute(&export_path).unwrap_or_else(|_| export_path.clone());
    logger.log(&format!(
        "JSON for {agency_key} created at {}",
        shown_path.display()
    ));

    // Custom log functions only get narrative lines.
    if !logger.has_custom() {
        logger.log(&stats_table(&stats));
    }

    debug!(
        routes = stats.routes,
        stops = stats.stops,
        stops_per_route = stats.stops_per_route(),
        "Agency exported"
    );
    logger.log(&format!("JSON generation required {elapsed_secs} seconds"));

    Ok(AgencyReport {
        agency_key: agency_key.to_string(),
        export_path,
        stats,
        elapsed_secs,
    })
}
