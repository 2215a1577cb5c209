/// GraphQL station-items client
///
/// Retrieves air quality monitoring-station metadata from the local GraphQL
/// endpoint. One fixed query, one blocking POST, no retries: any failure is
/// terminal for the page load that issued it.
///
/// Response handling is split out into `parse_response` so the status and
/// body rules can be tested without a network.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::model::{DashboardError, StationRecord};

/// The fixed `stationItems` query. Field order matches `model::STATION_FIELDS`.
pub const STATION_ITEMS_QUERY: &str = r#"
{
  stationItems {
    StationCode
    StationName
    StationShortName
    StationLocation
    StationCity
    StationLatitude
    StationLongitude
    MonitorChannel
    MonitorName
    MonitorTypeCode
    MonitorTypeDescription
    MonitorFullName
  }
}
"#;

// ============================================================================
// GraphQL Response Structures
// ============================================================================

/// Top-level GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<StationItemsData>,
    /// `Some` whenever the key is present, even as `null`.
    #[serde(default, deserialize_with = "present")]
    pub errors: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct StationItemsData {
    #[serde(rename = "stationItems")]
    pub station_items: Option<Vec<StationRecord>>,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// JSON body posted to the endpoint.
pub fn request_body() -> Value {
    json!({ "query": STATION_ITEMS_QUERY })
}

/// Build the blocking HTTP client. `timeout: None` waits indefinitely.
pub fn build_client(timeout: Option<Duration>) -> Result<Client, DashboardError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Fetch all station items
///
/// # Parameters
/// - `client`: HTTP client
/// - `endpoint`: GraphQL URL (e.g., "http://localhost:4000/graphql")
///
/// # Returns
/// The `data.stationItems` list, in response order
pub fn fetch_station_items(
    client: &Client,
    endpoint: &str,
) -> Result<Vec<StationRecord>, DashboardError> {
    let response = client
        .post(endpoint)
        .header("Accept", "application/json")
        .json(&request_body())
        .send()?;

    let status = response.status().as_u16();
    let body = response.text()?;

    parse_response(status, &body)
}

/// Apply the status and body rules to a raw response.
///
/// - non-200 → `Transport(status)`, body ignored
/// - body with an `errors` member, even `null` → `Query(errors)`
/// - body without `data.stationItems` → `Parse`
pub fn parse_response(status: u16, body: &str) -> Result<Vec<StationRecord>, DashboardError> {
    if status != 200 {
        return Err(DashboardError::Transport(status));
    }

    let envelope: GraphQlResponse = serde_json::from_str(body)?;

    if let Some(errors) = envelope.errors {
        return Err(DashboardError::Query(errors.to_string()));
    }

    envelope
        .data
        .and_then(|d| d.station_items)
        .ok_or_else(|| DashboardError::Parse("response has no data.stationItems".to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_requests_every_station_field() {
        for field in crate::model::STATION_FIELDS {
            assert!(STATION_ITEMS_QUERY.contains(field), "query is missing {}", field);
        }
        assert_eq!(request_body()["query"], STATION_ITEMS_QUERY);
    }

    #[test]
    fn test_parse_success_preserves_order_and_values() {
        let body = r#"{"data": {"stationItems": [
            {"StationName": "Ashburton", "MonitorChannel": 1, "MonitorFullName": "PM10"},
            {"StationName": "Timaru", "MonitorChannel": "4", "MonitorFullName": "PM2.5"}
        ]}}"#;
        let items = parse_response(200, body).expect("valid payload");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].station_name(), "Ashburton");
        assert_eq!(items[0].monitor_channel.as_deref(), Some("1"));
        assert_eq!(items[1].monitor_channel.as_deref(), Some("4"));
    }

    #[test]
    fn test_parse_empty_list() {
        let items = parse_response(200, r#"{"data": {"stationItems": []}}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_non_200_is_transport_error_regardless_of_body() {
        let err = parse_response(500, "<html>oops</html>").unwrap_err();
        assert_eq!(err, DashboardError::Transport(500));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_errors_member_is_query_error_with_payload() {
        let body = r#"{"errors": [{"message": "Cannot query field \"Bogus\""}], "data": null}"#;
        let err = parse_response(200, body).unwrap_err();
        match &err {
            DashboardError::Query(payload) => assert!(payload.contains("Cannot query field")),
            other => panic!("expected Query error, got {:?}", other),
        }
        assert!(err.to_string().starts_with("GraphQL error:"));
    }

    #[test]
    fn test_null_errors_member_is_still_a_query_error() {
        let body = r#"{"errors": null, "data": {"stationItems": [{"StationName": "A"}]}}"#;
        assert_eq!(parse_response(200, body), Err(DashboardError::Query("null".to_string())));
    }

    #[test]
    fn test_absent_errors_member_is_success() {
        let body = r#"{"data": {"stationItems": [{"StationName": "A"}]}}"#;
        assert_eq!(parse_response(200, body).unwrap().len(), 1);
    }

    #[test]
    fn test_body_without_station_items_is_parse_error() {
        assert!(matches!(parse_response(200, r#"{"data": {}}"#), Err(DashboardError::Parse(_))));
        assert!(matches!(parse_response(200, "not json"), Err(DashboardError::Parse(_))));
    }
}
