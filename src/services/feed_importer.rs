//! Trait and types for loading a GTFS feed into the store.

use async_trait::async_trait;

use crate::config::AgencyDescriptor;
use crate::error::Result;
use crate::infra::sqlite::Store;

/// GTFS tables that route and stop JSON never reads.
pub const EXCLUDED_TABLES: &[&str] = &[
    "areas",
    "attributions",
    "calendar_attributes",
    "directions",
    "fare_attributes",
    "fare_transfer_rules",
    "fare_leg_rules",
    "fare_products",
    "fare_rules",
    "feed_info",
    "levels",
    "pathways",
    "route_attributes",
    "shapes",
];

/// One agency to import, plus the tables to leave alone.
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub agency: &'a AgencyDescriptor,
    pub exclude: &'a [&'a str],
}

impl<'a> ImportRequest<'a> {
    /// A request using the fixed exclusion list.
    pub fn new(agency: &'a AgencyDescriptor) -> Self {
        Self {
            agency,
            exclude: EXCLUDED_TABLES,
        }
    }

    pub fn is_excluded(&self, table: &str) -> bool {
        self.exclude.contains(&table)
    }
}

/// Populates the store from an agency's feed.
///
/// After a successful call the store holds at least `routes`, `stops`,
/// `trips` and `stop_times` for that agency, replacing any earlier import.
#[async_trait(?Send)]
pub trait FeedImporter {
    async fn import_feed(&self, store: &mut Store, request: &ImportRequest<'_>) -> Result<()>;
}
