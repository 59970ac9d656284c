//! Concrete implementations of the service traits.

pub mod gtfs;
pub mod sqlite;
