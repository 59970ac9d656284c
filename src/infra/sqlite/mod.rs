//! SQLite-backed store for imported GTFS data.

pub mod schema;

use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::debug;

use crate::error::Result;
use crate::services::route_source::{RouteRow, RouteSource, Stop};
use schema::{GtfsTable, TABLES};

const ROUTES_QUERY: &str = "SELECT route_id, route_short_name, route_long_name, route_type \
     FROM routes ORDER BY route_short_name";

const ROUTE_STOPS_QUERY: &str = "SELECT stops.stop_id, stops.stop_name, stops.stop_lat, stops.stop_lon \
     FROM stops \
     INNER JOIN stop_times ON stops.stop_id = stop_times.stop_id \
     INNER JOIN trips ON trips.trip_id = stop_times.trip_id \
     WHERE trips.route_id = ?1 \
     ORDER BY stops.stop_name";

const FEED_VERSION_QUERY: &str = "SELECT feed_version FROM feed_info LIMIT 1";

/// Rows for one table, each aligned with `table.columns`.
pub struct TableLoad {
    pub table: &'static GtfsTable,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Explicit handle to the relational store. Passed to whoever needs it.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the database at `path`; `":memory:"` opens a private in-memory one.
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        for table in TABLES {
            conn.execute(&table.create_sql(), [])?;
        }
        Ok(Self { conn })
    }

    /// Replaces the contents of each listed table in a single transaction.
    ///
    /// Returns the total number of rows inserted.
    pub fn replace_tables(&mut self, loads: &[TableLoad]) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;

        for load in loads {
            tx.execute(&format!("DELETE FROM {}", load.table.name), [])?;

            let mut stmt = tx.prepare(&load.table.insert_sql())?;
            for row in &load.rows {
                stmt.execute(params_from_iter(row.iter()))?;
            }
            inserted += load.rows.len();
            debug!(table = load.table.name, rows = load.rows.len(), "Table loaded");
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Row count of a known table.
    #[cfg(test)]
    pub(crate) fn count(&self, table: &GtfsTable) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table.name), [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }
}

impl RouteSource for Store {
    fn routes(&self) -> Result<Vec<RouteRow>> {
        let mut stmt = self.conn.prepare(ROUTES_QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok(RouteRow {
                route_id: row.get(0)?,
                route_short_name: row.get(1)?,
                route_long_name: row.get(2)?,
                route_type: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn stops_for_route(&self, route_id: &str) -> Result<Vec<Stop>> {
        let mut stmt = self.conn.prepare_cached(ROUTE_STOPS_QUERY)?;
        let rows = stmt.query_map([route_id], |row| {
            Ok(Stop {
                stop_id: row.get(0)?,
                stop_name: row.get(1)?,
                stop_lat: row.get(2)?,
                stop_lon: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn feed_version(&self) -> Result<Option<String>> {
        let version: Option<Option<String>> = self
            .conn
            .query_row(FEED_VERSION_QUERY, [], |row| row.get(0))
            .optional()?;
        Ok(version.flatten())
    }
}
