/// StationRecord, Table, MonitorCount, DashboardError
/// core data structures and error handling
///
/// Core data types for the Canterbury air quality dashboard.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O. The only logic is the lenient field decoding that
/// turns a loosely-typed GraphQL item into a `StationRecord`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Every field requested from `stationItems`, in query and column order.
pub const STATION_FIELDS: [&str; 12] = [
    "StationCode",
    "StationName",
    "StationShortName",
    "StationLocation",
    "StationCity",
    "StationLatitude",
    "StationLongitude",
    "MonitorChannel",
    "MonitorName",
    "MonitorTypeCode",
    "MonitorTypeDescription",
    "MonitorFullName",
];

/// Name of the constant marker-size column added for the map.
pub const SIZE_COLUMN: &str = "size";

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One row per (station, monitor channel) pair.
///
/// Corresponds to one entry of `data.stationItems` in the GraphQL response.
/// Every field is optional: a field that is missing or `null` in the
/// response is `None` here rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_short_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub station_longitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub monitor_channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub monitor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub monitor_type_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub monitor_type_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub monitor_full_name: Option<String>,
}

impl StationRecord {
    /// Station name used for grouping and selection. A missing name groups
    /// under the empty string.
    pub fn station_name(&self) -> &str {
        self.station_name.as_deref().unwrap_or("")
    }

    /// Legend key for the map.
    pub fn short_name(&self) -> &str {
        self.station_short_name.as_deref().unwrap_or("")
    }

    /// Legend key and x value for the scatter plot.
    pub fn full_name(&self) -> &str {
        self.monitor_full_name.as_deref().unwrap_or("")
    }

    /// Marker latitude. Absent when missing or not a number.
    pub fn latitude(&self) -> Option<f64> {
        parse_coordinate(&self.station_latitude)
    }

    /// Marker longitude. Absent when missing or not a number.
    pub fn longitude(&self) -> Option<f64> {
        parse_coordinate(&self.station_longitude)
    }

    /// Display text of each field, in `STATION_FIELDS` order, as sent by
    /// the endpoint. Absent values are empty strings.
    pub fn cells(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            text(&self.station_code),
            text(&self.station_name),
            text(&self.station_short_name),
            text(&self.station_location),
            text(&self.station_city),
            text(&self.station_latitude),
            text(&self.station_longitude),
            text(&self.monitor_channel),
            text(&self.monitor_name),
            text(&self.monitor_type_code),
            text(&self.monitor_type_description),
            text(&self.monitor_full_name),
        ]
    }

    /// Names of the fields that are absent on this record.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.station_code.is_some(),
            self.station_name.is_some(),
            self.station_short_name.is_some(),
            self.station_location.is_some(),
            self.station_city.is_some(),
            self.station_latitude.is_some(),
            self.station_longitude.is_some(),
            self.monitor_channel.is_some(),
            self.monitor_name.is_some(),
            self.monitor_type_code.is_some(),
            self.monitor_type_description.is_some(),
            self.monitor_full_name.is_some(),
        ];
        STATION_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, p)| !p)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Ordered rows as returned by the endpoint. Insertion order is response
/// order and station names are not unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<StationRecord>,
}

impl Table {
    pub fn new(rows: Vec<StationRecord>) -> Self {
        Table { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Number of monitor rows for one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorCount {
    pub station_name: String,
    pub monitor_count: usize,
}

/// A table row with the constant marker-size column used by the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRow<'a> {
    pub record: &'a StationRecord,
    pub size: u32,
}

// ---------------------------------------------------------------------------
// Lenient decoding
// ---------------------------------------------------------------------------

/// Accepts a string or any other scalar. Non-string scalars keep their
/// JSON text so `1` stays `"1"`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn parse_coordinate(text: &Option<String>) -> Option<f64> {
    text.as_deref().and_then(|t| t.trim().parse().ok())
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching, transforming, or rendering the
/// dashboard.
#[derive(Debug, PartialEq)]
pub enum DashboardError {
    /// Non-200 HTTP response from the GraphQL endpoint.
    Transport(u16),
    /// HTTP 200 but the response carried a GraphQL `errors` array.
    Query(String),
    /// The endpoint could not be reached at all.
    Request(String),
    /// The response body could not be decoded.
    Parse(String),
    /// The selected station is not present and the fallback policy is strict.
    StationNotFound(String),
    /// The boundary file could not be read or is not GeoJSON.
    Boundary(String),
    /// The configuration file could not be read or parsed.
    Config(String),
    /// A page template failed to render.
    Template(String),
    /// The dashboard's own HTTP server could not start.
    Server(String),
}

impl DashboardError {
    /// HTTP status used when this error halts a page.
    pub fn status_code(&self) -> u16 {
        match self {
            DashboardError::Transport(_)
            | DashboardError::Query(_)
            | DashboardError::Request(_)
            | DashboardError::Parse(_) => 502,
            DashboardError::StationNotFound(_) => 404,
            _ => 500,
        }
    }
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Transport(code) => {
                write!(f, "Failed to fetch data from GraphQL API: {}", code)
            }
            DashboardError::Query(payload) => write!(f, "GraphQL error: {}", payload),
            DashboardError::Request(msg) => write!(f, "Request to GraphQL API failed: {}", msg),
            DashboardError::Parse(msg) => write!(f, "Parse error: {}", msg),
            DashboardError::StationNotFound(name) => write!(f, "Station not found: {}", name),
            DashboardError::Boundary(msg) => write!(f, "Boundary file error: {}", msg),
            DashboardError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DashboardError::Template(msg) => write!(f, "Template error: {}", msg),
            DashboardError::Server(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        DashboardError::Request(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Parse(e.to_string())
    }
}

impl From<handlebars::RenderError> for DashboardError {
    fn from(e: handlebars::RenderError) -> Self {
        DashboardError::Template(e.to_string())
    }
}

impl From<handlebars::TemplateError> for DashboardError {
    fn from(e: handlebars::TemplateError) -> Self {
        DashboardError::Template(e.to_string())
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(e: toml::de::Error) -> Self {
        DashboardError::Config(e.to_string())
    }
}
