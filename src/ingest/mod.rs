//! Data ingestion.
//!
//! - `graphql`: the live `stationItems` query.
//! - `crate::dev_mode` replays a saved response through the same parser.

pub mod graphql;
