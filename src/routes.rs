//! Shapes imported routes and their stops into exportable records.

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::formatters::compose_route_name;
use crate::services::route_source::{RouteRow, RouteSource, Stop};
use crate::stats::RunStats;

/// One entry of `<agencyKey>.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_type: Option<i64>,
    pub route_full_name: String,
    pub agency_id: String,
    pub stops: Vec<Stop>,
}

/// Routes for one agency together with the counters describing them.
#[derive(Debug, Clone, Default)]
pub struct AgencyRoutes {
    pub routes: Vec<Route>,
    pub stats: RunStats,
}

/// Reads routes and stops for the current feed and shapes them for export.
///
/// Routes are deduplicated by short name (first in short-name text order
/// wins) and then ordered by the integer value of the short name. Short
/// names without a leading integer sort after all numeric ones, keeping
/// their relative order. Each route's stops are deduplicated by name.
pub fn build_agency_routes(agency_key: &str, source: &impl RouteSource) -> Result<AgencyRoutes> {
    let rows = source.routes()?;
    let fetched = rows.len();

    let mut rows: Vec<RouteRow> = rows
        .into_iter()
        .unique_by(|row| row.route_short_name.clone())
        .collect();
    rows.sort_by_key(|row| {
        let key = short_name_sort_key(row.route_short_name.as_deref());
        (key.is_none(), key)
    });
    debug!(fetched, kept = rows.len(), "Routes deduplicated");

    let mut stats = RunStats::default();
    let mut routes = Vec::with_capacity(rows.len());

    for row in rows {
        let stops: Vec<Stop> = source
            .stops_for_route(&row.route_id)?
            .into_iter()
            .unique_by(|stop| stop.stop_name.clone())
            .collect();
        stats.add_route_stops(stops.len());
        routes.push(shape_route(row, agency_key, stops));
    }

    stats.add_routes(routes.len());

    Ok(AgencyRoutes { routes, stats })
}

fn shape_route(row: RouteRow, agency_key: &str, stops: Vec<Stop>) -> Route {
    let route_full_name = compose_route_name(
        row.route_short_name.as_deref(),
        row.route_long_name.as_deref(),
    );

    Route {
        route_id: row.route_id,
        route_short_name: row.route_short_name,
        route_long_name: row.route_long_name,
        route_type: row.route_type,
        route_full_name,
        agency_id: agency_key.to_string(),
        stops,
    }
}

/// Integer prefix of a short name: leading whitespace, an optional sign,
/// then digits (`"10A"` is 10). `None` when there are no digits or the
/// value does not fit in an `i64`.
pub fn short_name_sort_key(short_name: Option<&str>) -> Option<i64> {
    let trimmed = short_name?.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }

    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_len == 0 {
        return None;
    }

    trimmed[..sign_len + digits_len].parse().ok()
}
