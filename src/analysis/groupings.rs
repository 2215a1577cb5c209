//! Filtering and grouping over the fetched station table.
//!
//! Every function here is a pure recomputation from `Table`; nothing is
//! cached between page loads.

use std::collections::BTreeMap;

use crate::model::{MapRow, MonitorCount, STATION_FIELDS, StationRecord, Table};

// ---------------------------------------------------------------------------
// Table construction
// ---------------------------------------------------------------------------

/// One row per station item, in response order.
pub fn build_table(items: Vec<StationRecord>) -> Table {
    Table::new(items)
}

// ---------------------------------------------------------------------------
// Per-station views
// ---------------------------------------------------------------------------

/// Rows whose station name equals `station`, in table order.
pub fn filter_station<'a>(table: &'a Table, station: &str) -> Vec<&'a StationRecord> {
    table
        .rows
        .iter()
        .filter(|row| row.station_name() == station)
        .collect()
}

/// Number of rows per station name, sorted by name.
///
/// Counts rows, not distinct monitor types: a station reporting the same
/// type on two channels counts twice.
pub fn monitor_counts(table: &Table) -> Vec<MonitorCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &table.rows {
        *counts.entry(row.station_name()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| MonitorCount {
            station_name: name.to_string(),
            monitor_count: count,
        })
        .collect()
}

/// Every row with the constant marker-size column attached.
pub fn map_rows(table: &Table, size: u32) -> Vec<MapRow<'_>> {
    table
        .rows
        .iter()
        .map(|record| MapRow { record, size })
        .collect()
}

// ---------------------------------------------------------------------------
// Shape report
// ---------------------------------------------------------------------------

/// For each field that is absent on at least one row, the number of rows
/// lacking it. Fields appear in column order.
pub fn missing_field_counts(table: &Table) -> Vec<(&'static str, usize)> {
    let mut counts = [0usize; STATION_FIELDS.len()];
    for row in &table.rows {
        for field in row.missing_fields() {
            if let Some(idx) = STATION_FIELDS.iter().position(|f| *f == field) {
                counts[idx] += 1;
            }
        }
    }
    STATION_FIELDS
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(field, n)| (*field, n))
        .collect()
}
