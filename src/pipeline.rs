//! One page load: fetch, transform, render.
//!
//! Nothing is kept between runs. Each call fetches the table afresh, loads
//! the boundary file afresh, and renders from those.

use reqwest::blocking::Client;
use serde::Serialize;

use crate::analysis::groupings;
use crate::boundary::RegionBoundary;
use crate::config::Config;
use crate::dev_mode::DevMode;
use crate::ingest::graphql;
use crate::logging::{self, Component};
use crate::model::{DashboardError, Table};
use crate::render::{self, DashboardView, HaltedView};

/// Result of a page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    Dashboard(DashboardView),
    Halted(HaltedView),
}

impl Page {
    pub fn status_code(&self) -> u16 {
        match self {
            Page::Dashboard(_) => 200,
            Page::Halted(h) => h.status,
        }
    }
}

pub struct Pipeline {
    cfg: Config,
    client: Client,
}

impl Pipeline {
    pub fn new(cfg: Config) -> Result<Pipeline, DashboardError> {
        let client = graphql::build_client(cfg.request_timeout())?;
        Ok(Pipeline { cfg, client })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Where station items come from: the log component and the subject
    /// naming the snapshot file or the endpoint.
    pub fn fetch_source(&self) -> (Component, String) {
        match self.cfg.snapshot_path {
            Some(ref path) => (Component::Snapshot, DevMode::new(path).describe()),
            None => (Component::GraphQl, self.cfg.graphql_endpoint.clone()),
        }
    }

    /// Fetch the station table from the snapshot if one is configured,
    /// otherwise from the GraphQL endpoint.
    pub fn fetch_table(&self) -> Result<Table, DashboardError> {
        let (component, source) = self.fetch_source();
        let items = match self.cfg.snapshot_path {
            Some(ref path) => {
                logging::debug(component, Some(source.as_str()), "replaying snapshot");
                DevMode::new(path).fetch_station_items()
            }
            None => graphql::fetch_station_items(&self.client, &self.cfg.graphql_endpoint),
        };

        match items {
            Ok(items) => {
                logging::info(component, Some(source.as_str()), &format!("fetched {} station items", items.len()));
                Ok(groupings::build_table(items))
            }
            Err(e) => {
                logging::log_fetch_failure(component, &source, "stationItems query", &e);
                Err(e)
            }
        }
    }

    /// Load the boundary overlay. Failure only drops the overlay; the
    /// returned notice explains why.
    pub fn load_boundary(&self) -> (Option<RegionBoundary>, Option<String>) {
        let Some(ref path) = self.cfg.boundary_path else {
            return (None, None);
        };
        match RegionBoundary::load(path) {
            Ok(boundary) => {
                logging::debug(
                    Component::Boundary,
                    Some(path.as_str()),
                    &format!("loaded {} features", boundary.feature_count()),
                );
                (Some(boundary), None)
            }
            Err(e) => {
                logging::warn(Component::Boundary, Some(path.as_str()), &e.to_string());
                (None, Some(format!("Map shown without region boundaries. {}", e)))
            }
        }
    }

    /// Run the whole pipeline for one request.
    pub fn run(&self, requested: Option<&str>) -> Result<DashboardView, DashboardError> {
        let table = self.fetch_table()?;
        let (boundary, boundary_notice) = self.load_boundary();
        let mut view = render::render(&table, requested, boundary.as_ref(), &self.cfg)?;
        if view.widgets.is_some() {
            view.notices.extend(boundary_notice);
        }
        Ok(view)
    }

    /// Like `run`, but a failure becomes the halted page.
    pub fn page(&self, requested: Option<&str>) -> Page {
        match self.run(requested) {
            Ok(view) => Page::Dashboard(view),
            Err(e) => {
                logging::error(Component::Render, requested, &format!("page halted: {}", e));
                Page::Halted(render::render_halted(&e, &self.cfg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn snapshot_config(body: &str) -> (Config, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        let cfg = Config {
            snapshot_path: Some(file.path().to_string_lossy().into_owned()),
            boundary_path: None,
            ..Default::default()
        };
        (cfg, file)
    }

    #[test]
    fn test_snapshot_page_renders_dashboard() {
        let (cfg, _file) = snapshot_config(
            r#"{"data": {"stationItems": [{"StationName": "Ashburton", "MonitorChannel": 1}]}}"#,
        );
        let page = Pipeline::new(cfg).unwrap().page(None);
        assert_eq!(page.status_code(), 200);
        match page {
            Page::Dashboard(view) => assert_eq!(view.selected_station.as_deref(), Some("Ashburton")),
            other => panic!("expected dashboard, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_source_names_snapshot_or_endpoint() {
        let (cfg, file) = snapshot_config(r#"{"data": {"stationItems": []}}"#);
        let (component, source) = Pipeline::new(cfg).unwrap().fetch_source();
        assert_eq!(component, Component::Snapshot);
        assert!(source.starts_with("snapshot:"));
        assert!(source.ends_with(&*file.path().to_string_lossy()));

        let live = Config {
            graphql_endpoint: "http://localhost:4000/graphql".to_string(),
            boundary_path: None,
            ..Default::default()
        };
        let (component, source) = Pipeline::new(live).unwrap().fetch_source();
        assert_eq!(component, Component::GraphQl);
        assert_eq!(source, "http://localhost:4000/graphql");
    }

    #[test]
    fn test_query_error_halts_page() {
        let (cfg, _file) = snapshot_config(r#"{"errors": [{"message": "schema mismatch"}]}"#);
        match Pipeline::new(cfg).unwrap().page(None) {
            Page::Halted(h) => {
                assert!(h.message.contains("schema mismatch"));
                assert_eq!(h.status, 502);
            }
            other => panic!("expected halted page, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_boundary_file_only_adds_notice() {
        let (mut cfg, _file) =
            snapshot_config(r#"{"data": {"stationItems": [{"StationName": "Ashburton"}]}}"#);
        cfg.boundary_path = Some("/nonexistent/gadm41_NZL_2.json".to_string());
        let view = Pipeline::new(cfg).unwrap().run(None).unwrap();
        assert!(view.widgets.is_some());
        assert!(view.notices.iter().any(|n| n.contains("without region boundaries")));
    }

    #[test]
    fn test_page_serializes_with_kind_tag() {
        let (cfg, _file) = snapshot_config(r#"{"data": {"stationItems": []}}"#);
        let page = Pipeline::new(cfg).unwrap().page(None);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["kind"], "dashboard");
        assert_eq!(json["station_options"], serde_json::json!([]));
    }
}
