/// Development mode utilities for working without a GraphQL server
///
/// When the local endpoint is not running, point `snapshot_path` at a saved
/// response body and the dashboard replays it. The snapshot goes through the
/// same response parser as a live 200 response, so a saved `errors` payload
/// halts the page exactly like a live one.

use std::path::{Path, PathBuf};

use crate::ingest::graphql;
use crate::model::{DashboardError, StationRecord};

/// Configuration for snapshot replay
pub struct DevMode {
    /// Saved GraphQL response body
    pub snapshot_path: PathBuf,
}

impl DevMode {
    pub fn new(snapshot_path: impl AsRef<Path>) -> Self {
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
        }
    }

    /// Read the snapshot as if the endpoint had answered 200 with it.
    pub fn fetch_station_items(&self) -> Result<Vec<StationRecord>, DashboardError> {
        let body = std::fs::read_to_string(&self.snapshot_path).map_err(|e| {
            DashboardError::Request(format!("snapshot {}: {}", self.snapshot_path.display(), e))
        })?;
        graphql::parse_response(200, &body)
    }

    /// Label used in logs.
    pub fn describe(&self) -> String {
        format!("snapshot:{}", self.snapshot_path.display())
    }
}
