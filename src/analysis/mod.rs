/// Table reshaping for the dashboard.
///
/// This module turns the flat fetched table into the views the renderer
/// binds: the per-station subset, the per-station monitor counts, the map
/// rows, and a report of missing fields.
///
/// Submodules:
/// - `groupings`: filtering and grouping over `model::Table`.

pub mod groupings;
