//! CLI entry point for GTFS-to-JSON.
//!
//! Reads a JSON config listing agencies, imports each feed into SQLite and
//! writes route/stop JSON plus a run log per agency.

use anyhow::Result;
use clap::Parser;
use gtfs_to_json::infra::gtfs::GtfsImporter;
use gtfs_to_json::{Config, run};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs-to-json")]
#[command(about = "Generate route and stop JSON from GTFS feeds", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short = 'c', long = "config-path", default_value = "./config.json")]
    config_path: PathBuf,

    /// Don't import GTFS files, use the data already in the database
    #[arg(short = 's', long)]
    skip_import: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gtfs_to_json.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_to_json.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = generate(&cli).await {
        error!(error = %format!("{e:#}"), "GTFS-to-JSON failed");
        return Err(e);
    }

    Ok(())
}

async fn generate(cli: &Cli) -> Result<()> {
    let mut config = Config::load(&cli.config_path)?;
    if cli.skip_import {
        config.skip_import = true;
    }

    let importer = GtfsImporter::new()?;
    let reports = run(&config, &importer).await?;

    let routes: usize = reports.iter().map(|r| r.stats.routes).sum();
    let stops: usize = reports.iter().map(|r| r.stats.stops).sum();
    info!(agencies = reports.len(), routes, stops, "GTFS-to-JSON finished");

    Ok(())
}
