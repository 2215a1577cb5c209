//! Dashboard configuration.
//!
//! Loaded from a TOML file. Every key has a default, so a missing file or a
//! partial file is fine.

use serde::Deserialize;
use std::path::Path;

use crate::logging::LogLevel;
use crate::model::DashboardError;
use crate::render::style::StyleConfig;
use crate::stations::FallbackPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "./aqmon.toml";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/graphql";

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "AQMON_CONFIG";
/// Environment variable overriding `graphql_endpoint`.
pub const ENDPOINT_VAR: &str = "AQMON_GRAPHQL_ENDPOINT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the dashboard listens on.
    pub listen: String,
    /// GraphQL endpoint serving `stationItems`.
    pub graphql_endpoint: String,
    /// Request timeout. Absent means the fetch waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// GeoJSON region boundaries drawn under the map markers.
    pub boundary_path: Option<String>,
    /// Saved GraphQL response to serve instead of querying the endpoint.
    pub snapshot_path: Option<String>,
    pub selection: SelectionConfig,
    pub map: MapConfig,
    pub style: StyleConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: "127.0.0.1:8501".to_string(),
            graphql_endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            boundary_path: Some("./gadm41_NZL_2.json".to_string()),
            snapshot_path: None,
            selection: SelectionConfig::default(),
            map: MapConfig::default(),
            style: StyleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Station selected when the request names none.
    pub default_station: String,
    /// What to do when the wanted station is not in the data.
    pub fallback: FallbackPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            default_station: "Ashburton".to_string(),
            fallback: FallbackPolicy::FirstAvailable,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    pub basemap_style: String,
    pub height: u32,
    /// Rendered marker diameter, shared by every station.
    pub marker_size: u32,
    /// Value of the constant `size` column.
    pub size_column_value: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            center_lat: -43.91224,
            center_lon: 171.7552,
            zoom: 8.0,
            basemap_style: "carto-positron".to_string(),
            height: 900,
            marker_size: 49,
            size_column_value: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            file: None,
            console_timestamps: true,
        }
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Config, DashboardError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, DashboardError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        Config::from_toml(&text)
    }

    /// Load `.env`, then the file named by `AQMON_CONFIG` (or the default
    /// path), then apply `AQMON_GRAPHQL_ENDPOINT`.
    pub fn from_env() -> Result<Config, DashboardError> {
        dotenv::dotenv().ok();
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Config::load(&path)?;
        cfg.apply_endpoint_override(std::env::var(ENDPOINT_VAR).ok());
        Ok(cfg)
    }

    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.graphql_endpoint = endpoint;
        }
    }

    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_secs.map(std::time::Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.graphql_endpoint, "http://localhost:4000/graphql");
        assert_eq!(cfg.selection.default_station, "Ashburton");
        assert_eq!(cfg.map.zoom, 8.0);
        assert_eq!(cfg.map.height, 900);
        assert!(cfg.request_timeout().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            graphql_endpoint = "http://aq.example:4000/graphql"

            [selection]
            fallback = "error"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.graphql_endpoint, "http://aq.example:4000/graphql");
        assert_eq!(cfg.selection.fallback, FallbackPolicy::Error);
        assert_eq!(cfg.selection.default_station, "Ashburton");
        assert_eq!(cfg.logging.level, LogLevel::Debug);
        assert_eq!(cfg.listen, "127.0.0.1:8501");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("listen = [").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.listen, Config::default().listen);
    }

    #[test]
    fn test_unreadable_file_is_config_error_naming_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
        assert!(err.to_string().contains(&*dir.path().to_string_lossy()));
    }

    #[test]
    fn test_endpoint_override_ignores_blank_values() {
        let mut cfg = Config::default();
        cfg.apply_endpoint_override(Some("  ".to_string()));
        assert_eq!(cfg.graphql_endpoint, DEFAULT_ENDPOINT);
        cfg.apply_endpoint_override(Some("http://other/graphql".to_string()));
        assert_eq!(cfg.graphql_endpoint, "http://other/graphql");
    }
}
