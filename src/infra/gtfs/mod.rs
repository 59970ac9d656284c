//! Imports GTFS feeds from a URL, a zip file, or an unpacked directory.

pub mod source;

use std::path::Path;

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::config::AgencyDescriptor;
use crate::error::{Error, ImportError, Result};
use crate::fetch::{BasicClient, HttpClient, WithHeaders, fetch_bytes};
use crate::infra::sqlite::schema::{GtfsTable, TABLES};
use crate::infra::sqlite::{Store, TableLoad};
use crate::services::feed_importer::{FeedImporter, ImportRequest};
use source::FeedArchive;

/// [`FeedImporter`] that loads the standard GTFS text files into SQLite.
pub struct GtfsImporter<C = BasicClient> {
    client: C,
}

impl GtfsImporter<BasicClient> {
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self::with_client(BasicClient::new()?))
    }
}

impl<C: HttpClient> GtfsImporter<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Resolves the feed location. A URL wins over a local path.
    async fn open_feed(
        &self,
        agency: &AgencyDescriptor,
    ) -> std::result::Result<FeedArchive, ImportError> {
        if let Some(url) = &agency.url {
            info!(url = %url, "Downloading GTFS feed");
            let client = WithHeaders {
                inner: &self.client,
                headers: agency.headers.clone(),
            };
            let bytes = fetch_bytes(&client, url).await?;
            debug!(bytes = bytes.len(), "Feed downloaded");
            FeedArchive::from_zip_bytes(bytes)
        } else if let Some(path) = &agency.path {
            info!(path = %path, "Reading GTFS feed");
            FeedArchive::open_path(Path::new(path)).await
        } else {
            Err(ImportError::NoSource)
        }
    }
}

/// Reads every known, non-excluded table from the feed.
pub fn read_tables(
    feed: &mut FeedArchive,
    exclude: &[&str],
) -> std::result::Result<Vec<TableLoad>, ImportError> {
    let mut loads = Vec::new();

    for &table in TABLES {
        if exclude.contains(&table.name) {
            continue;
        }

        let file_name = table.file_name();
        let rows = match feed.read_file(&file_name)? {
            Some(text) => parse_table(table, &file_name, &text)?,
            None if table.required => return Err(ImportError::MissingFile(file_name)),
            None => {
                debug!(file = %file_name, "Optional file absent");
                Vec::new()
            }
        };

        loads.push(TableLoad { table, rows });
    }

    Ok(loads)
}

/// Maps CSV records onto the table's columns by header name.
///
/// Unknown columns are ignored; missing columns and empty fields become NULL.
fn parse_table(
    table: &GtfsTable,
    file_name: &str,
    text: &str,
) -> std::result::Result<Vec<Vec<Option<String>>>, ImportError> {
    let csv_error = |source: csv::Error| ImportError::Csv {
        file: file_name.to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    let positions: Vec<Option<usize>> = table
        .column_names()
        .map(|column| headers.iter().position(|header| header == column))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row = positions
            .iter()
            .map(|position| {
                position
                    .and_then(|i| record.get(i))
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[async_trait(?Send)]
impl<C: HttpClient> FeedImporter for GtfsImporter<C> {
    #[tracing::instrument(skip_all, fields(agency_key = %request.agency.agency_key))]
    async fn import_feed(&self, store: &mut Store, request: &ImportRequest<'_>) -> Result<()> {
        let wrap = |source: ImportError| Error::Import {
            agency_key: request.agency.agency_key.clone(),
            source,
        };

        let mut feed = self.open_feed(request.agency).await.map_err(wrap)?;
        let loads = read_tables(&mut feed, request.exclude).map_err(wrap)?;
        let rows = store
            .replace_tables(&loads)
            .map_err(|e| wrap(ImportError::Store(e)))?;

        info!(tables = loads.len(), rows, "GTFS import complete");
        Ok(())
    }
}
