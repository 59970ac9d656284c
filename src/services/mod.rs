//! Seams between the export pipeline and the collaborators it drives.

pub mod feed_importer;
pub mod route_source;
