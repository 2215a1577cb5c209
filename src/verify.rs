//! Endpoint Verification Module
//!
//! Probes the configured GraphQL endpoint and reports whether it is
//! reachable, how many station items it returns, and which fields are
//! missing from them.
//!
//! Use this before pointing the dashboard at a new endpoint.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::analysis::groupings;
use crate::ingest::graphql;
use crate::model::{DashboardError, StationRecord};
use crate::stations;

/// Probe requests give up after this long, unlike page fetches.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointVerification {
    pub timestamp: String,
    pub endpoint: String,
    pub status: VerificationStatus,
    pub reachable: bool,
    pub http_status: Option<u16>,
    pub item_count: usize,
    pub station_count: usize,
    pub missing_fields: Vec<FieldGap>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldGap {
    pub field: String,
    pub rows_missing: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Endpoint Verification
// ============================================================================

pub fn verify_endpoint(client: &reqwest::blocking::Client, endpoint: &str) -> EndpointVerification {
    let response = client
        .post(endpoint)
        .json(&graphql::request_body())
        .timeout(PROBE_TIMEOUT)
        .send();

    match response {
        Ok(response) => {
            let status = response.status().as_u16();
            let parsed = response
                .text()
                .map_err(DashboardError::from)
                .and_then(|body| graphql::parse_response(status, &body));
            summarize(endpoint, Some(status), parsed)
        }
        Err(e) => summarize(endpoint, None, Err(DashboardError::from(e))),
    }
}

/// Build the report from the probe outcome. `http_status` is `None` when
/// the endpoint never answered.
pub fn summarize(
    endpoint: &str,
    http_status: Option<u16>,
    parsed: Result<Vec<StationRecord>, DashboardError>,
) -> EndpointVerification {
    let mut result = EndpointVerification {
        timestamp: Utc::now().to_rfc3339(),
        endpoint: endpoint.to_string(),
        status: VerificationStatus::Failed,
        reachable: http_status.is_some(),
        http_status,
        item_count: 0,
        station_count: 0,
        missing_fields: Vec::new(),
        error_message: None,
    };

    match parsed {
        Ok(items) => {
            let table = groupings::build_table(items);
            result.item_count = table.len();
            result.station_count = stations::station_names(&table).len();
            result.missing_fields = groupings::missing_field_counts(&table)
                .into_iter()
                .map(|(field, rows_missing)| FieldGap {
                    field: field.to_string(),
                    rows_missing,
                })
                .collect();

            result.status = if result.item_count > 0 && result.missing_fields.is_empty() {
                VerificationStatus::Success
            } else {
                VerificationStatus::PartialSuccess
            };
        }
        Err(e) => {
            result.error_message = Some(e.to_string());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(station: &str) -> StationRecord {
        StationRecord {
            station_code: Some("1".into()),
            station_name: Some(station.into()),
            station_short_name: Some(station.into()),
            station_location: Some("Domain".into()),
            station_city: Some(station.into()),
            station_latitude: Some("-43.9".to_string()),
            station_longitude: Some("171.7".to_string()),
            monitor_channel: Some("1".into()),
            monitor_name: Some("PM10".into()),
            monitor_type_code: Some("PM10".into()),
            monitor_type_description: Some("Particulates".into()),
            monitor_full_name: Some("PM10 BAM".into()),
        }
    }

    #[test]
    fn test_complete_items_are_success() {
        let report = summarize(
            "http://localhost:4000/graphql",
            Some(200),
            Ok(vec![complete("Ashburton"), complete("Ashburton"), complete("Timaru")]),
        );
        assert_eq!(report.status, VerificationStatus::Success);
        assert_eq!(report.item_count, 3);
        assert_eq!(report.station_count, 2);
        assert!(report.reachable);
    }

    #[test]
    fn test_missing_fields_are_partial_success() {
        let mut partial = complete("Timaru");
        partial.monitor_name = None;
        let report = summarize("e", Some(200), Ok(vec![complete("Ashburton"), partial]));
        assert_eq!(report.status, VerificationStatus::PartialSuccess);
        assert_eq!(
            report.missing_fields,
            vec![FieldGap { field: "MonitorName".to_string(), rows_missing: 1 }]
        );
    }

    #[test]
    fn test_empty_list_is_partial_success() {
        let report = summarize("e", Some(200), Ok(Vec::new()));
        assert_eq!(report.status, VerificationStatus::PartialSuccess);
    }

    #[test]
    fn test_transport_error_is_failed_but_reachable() {
        let report = summarize("e", Some(500), Err(DashboardError::Transport(500)));
        assert_eq!(report.status, VerificationStatus::Failed);
        assert!(report.reachable);
        assert!(report.error_message.unwrap().contains("500"));
    }

    #[test]
    fn test_unreachable_endpoint_is_failed() {
        let report = summarize("e", None, Err(DashboardError::Request("refused".into())));
        assert!(!report.reachable);
        assert_eq!(report.http_status, None);
        assert_eq!(report.status, VerificationStatus::Failed);
    }
}
