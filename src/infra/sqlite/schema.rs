//! GTFS tables known to the store.

/// A GTFS file mirrored as one SQLite table.
#[derive(Debug)]
pub struct GtfsTable {
    pub name: &'static str,
    /// `(column, SQLite type)` pairs, in insertion order.
    pub columns: &'static [(&'static str, &'static str)],
    /// Whether a feed without this file is rejected.
    pub required: bool,
}

impl GtfsTable {
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub(crate) fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(name, sql_type)| format!("{name} {sql_type}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({columns})", self.name)
    }

    pub(crate) fn insert_sql(&self) -> String {
        let names = self.column_names().collect::<Vec<_>>().join(", ");
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {} ({names}) VALUES ({placeholders})", self.name)
    }
}

pub const AGENCY: GtfsTable = GtfsTable {
    name: "agency",
    columns: &[
        ("agency_id", "TEXT"),
        ("agency_name", "TEXT"),
        ("agency_url", "TEXT"),
        ("agency_timezone", "TEXT"),
        ("agency_lang", "TEXT"),
        ("agency_phone", "TEXT"),
    ],
    required: false,
};

pub const ROUTES: GtfsTable = GtfsTable {
    name: "routes",
    columns: &[
        ("route_id", "TEXT"),
        ("agency_id", "TEXT"),
        ("route_short_name", "TEXT"),
        ("route_long_name", "TEXT"),
        ("route_desc", "TEXT"),
        ("route_type", "INTEGER"),
        ("route_url", "TEXT"),
        ("route_color", "TEXT"),
        ("route_text_color", "TEXT"),
        ("route_sort_order", "INTEGER"),
    ],
    required: true,
};

pub const STOPS: GtfsTable = GtfsTable {
    name: "stops",
    columns: &[
        ("stop_id", "TEXT"),
        ("stop_code", "TEXT"),
        ("stop_name", "TEXT"),
        ("stop_desc", "TEXT"),
        ("stop_lat", "REAL"),
        ("stop_lon", "REAL"),
        ("zone_id", "TEXT"),
        ("stop_url", "TEXT"),
        ("location_type", "INTEGER"),
        ("parent_station", "TEXT"),
        ("wheelchair_boarding", "INTEGER"),
        ("platform_code", "TEXT"),
    ],
    required: true,
};

pub const TRIPS: GtfsTable = GtfsTable {
    name: "trips",
    columns: &[
        ("route_id", "TEXT"),
        ("service_id", "TEXT"),
        ("trip_id", "TEXT"),
        ("trip_headsign", "TEXT"),
        ("trip_short_name", "TEXT"),
        ("direction_id", "INTEGER"),
        ("block_id", "TEXT"),
        ("shape_id", "TEXT"),
        ("wheelchair_accessible", "INTEGER"),
        ("bikes_allowed", "INTEGER"),
    ],
    required: true,
};

pub const STOP_TIMES: GtfsTable = GtfsTable {
    name: "stop_times",
    columns: &[
        ("trip_id", "TEXT"),
        ("arrival_time", "TEXT"),
        ("departure_time", "TEXT"),
        ("stop_id", "TEXT"),
        ("stop_sequence", "INTEGER"),
        ("stop_headsign", "TEXT"),
        ("pickup_type", "INTEGER"),
        ("drop_off_type", "INTEGER"),
        ("shape_dist_traveled", "REAL"),
        ("timepoint", "INTEGER"),
    ],
    required: true,
};

pub const FEED_INFO: GtfsTable = GtfsTable {
    name: "feed_info",
    columns: &[
        ("feed_publisher_name", "TEXT"),
        ("feed_publisher_url", "TEXT"),
        ("feed_lang", "TEXT"),
        ("feed_start_date", "TEXT"),
        ("feed_end_date", "TEXT"),
        ("feed_version", "TEXT"),
    ],
    required: false,
};

pub const TABLES: &[&GtfsTable] = &[&AGENCY, &ROUTES, &STOPS, &TRIPS, &STOP_TIMES, &FEED_INFO];
