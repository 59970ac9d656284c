//! Read-only access to imported routes and stops.

use serde::Serialize;

use crate::error::Result;

/// A route row as fetched from the store, before shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRow {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_type: Option<i64>,
}

/// A stop served by a route. Emitted verbatim in the exported JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
}

/// Abstraction over the relational store holding an imported feed.
pub trait RouteSource {
    /// All routes, ordered by short name using the store's string ordering.
    fn routes(&self) -> Result<Vec<RouteRow>>;

    /// Stops reached by any trip of `route_id`, ordered by stop name.
    ///
    /// A stop appears once per stop time, so duplicates are expected.
    fn stops_for_route(&self, route_id: &str) -> Result<Vec<Stop>>;

    /// `feed_version` of the first feed_info record, if any.
    fn feed_version(&self) -> Result<Option<String>>;
}
