//! Canterbury air quality monitoring-station dashboard.
//!
//! Fetches station/monitor metadata from a local GraphQL endpoint, reshapes
//! it into a table, and renders a detail table, a scatter plot, a bar chart,
//! and a map from it on every page load.

pub mod analysis;
pub mod boundary;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod stations;
pub mod verify;
pub mod web;
