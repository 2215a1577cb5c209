/// Station index and selection for the dashboard.
///
/// Station names come from the fetched table, never from a hardcoded
/// registry. This module lists them for the selector and decides which
/// station is selected when the wanted one is absent.

use serde::Deserialize;

use crate::config::SelectionConfig;
use crate::model::{DashboardError, Table};

// ---------------------------------------------------------------------------
// Fallback policy
// ---------------------------------------------------------------------------

/// Behavior when the wanted station is not present in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Select the first station in the table instead.
    FirstAvailable,
    /// Halt the page with `DashboardError::StationNotFound`.
    Error,
}

// ---------------------------------------------------------------------------
// Station names
// ---------------------------------------------------------------------------

/// Distinct station names in first-seen order.
pub fn station_names(table: &Table) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for row in &table.rows {
        let name = row.station_name();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Pick the selected station.
///
/// `requested` is the station named by the page request, if any; otherwise
/// the configured default is wanted. Returns `Ok(None)` only when the table
/// has no stations at all.
pub fn resolve_selection(
    names: &[&str],
    requested: Option<&str>,
    cfg: &SelectionConfig,
) -> Result<Option<String>, DashboardError> {
    let Some(first) = names.first() else {
        return Ok(None);
    };

    let wanted = requested.unwrap_or(&cfg.default_station);
    if names.contains(&wanted) {
        return Ok(Some(wanted.to_string()));
    }

    match cfg.fallback {
        FallbackPolicy::FirstAvailable => Ok(Some(first.to_string())),
        FallbackPolicy::Error => Err(DashboardError::StationNotFound(wanted.to_string())),
    }
}
