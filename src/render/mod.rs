//! Dashboard view model.
//!
//! `render` is a pure function from the fetched table and the requested
//! station to everything the page shows. The HTTP layer calls it once per
//! request; templates only lay the result out.

pub mod figures;
pub mod style;
pub mod table;

use serde::Serialize;

use crate::analysis::groupings;
use crate::boundary::RegionBoundary;
use crate::config::Config;
use crate::logging::{self, Component};
use crate::model::{DashboardError, Table};
use crate::stations;

use self::figures::Figure;
use self::table::DetailTable;

pub const PAGE_TITLE: &str = "Canterbury Air Quality Index Real-time Monitoring";
pub const DASHBOARD_TITLE: &str = "Canterbury Air Quality Monitoring Stations Visualization";
pub const DISTRIBUTION_HEADER: &str = "Monitoring Station pollution Distribution";
pub const EMPTY_NOTICE: &str = "No monitoring stations were returned by the GraphQL API.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationOption {
    pub name: String,
    pub selected: bool,
}

/// The four widgets, present only when a station is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widgets {
    pub station_header: String,
    pub details: DetailTable,
    pub scatter_header: String,
    pub scatter: Figure,
    pub distribution_header: &'static str,
    pub bar: Figure,
    pub map: Figure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub page_title: &'static str,
    pub title: &'static str,
    pub stylesheet: String,
    pub station_options: Vec<StationOption>,
    pub selected_station: Option<String>,
    pub notices: Vec<String>,
    pub widgets: Option<Widgets>,
}

/// What the page shows when the pipeline halts: the title and the error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HaltedView {
    pub page_title: &'static str,
    pub stylesheet: String,
    pub message: String,
    pub status: u16,
}

/// Build the full view for one page load.
///
/// `requested` is the station named by the request; `None` selects the
/// configured default. Fails only when the selection policy is strict and
/// the wanted station is absent.
pub fn render(
    table: &Table,
    requested: Option<&str>,
    boundary: Option<&RegionBoundary>,
    cfg: &Config,
) -> Result<DashboardView, DashboardError> {
    let names = stations::station_names(table);
    let selected = stations::resolve_selection(&names, requested, &cfg.selection)?;

    let mut notices = Vec::new();
    let missing = groupings::missing_field_counts(table);
    logging::log_shape_summary(table.len(), &missing);
    if !missing.is_empty() {
        let parts: Vec<String> = missing
            .iter()
            .map(|(field, n)| format!("{} ({} of {} rows)", field, n, table.len()))
            .collect();
        notices.push(format!("Some station items are missing fields: {}", parts.join(", ")));
    }

    let station_options = names
        .iter()
        .map(|name| StationOption {
            name: name.to_string(),
            selected: selected.as_deref() == Some(*name),
        })
        .collect();

    let widgets = match selected.as_deref() {
        None => {
            notices.push(EMPTY_NOTICE.to_string());
            None
        }
        Some(station) => {
            let wanted = requested.unwrap_or(&cfg.selection.default_station);
            if wanted != station {
                notices.push(format!("Station \"{}\" not found, showing \"{}\" instead.", wanted, station));
            }
            Some(build_widgets(table, station, boundary, cfg))
        }
    };

    logging::debug(
        Component::Render,
        selected.as_deref(),
        &format!("rendered {} rows across {} stations", table.len(), names.len()),
    );

    Ok(DashboardView {
        page_title: PAGE_TITLE,
        title: DASHBOARD_TITLE,
        stylesheet: cfg.style.stylesheet(),
        station_options,
        selected_station: selected,
        notices,
        widgets,
    })
}

fn build_widgets(
    table: &Table,
    station: &str,
    boundary: Option<&RegionBoundary>,
    cfg: &Config,
) -> Widgets {
    let subset = groupings::filter_station(table, station);
    let counts = groupings::monitor_counts(table);
    let map_rows = groupings::map_rows(table, cfg.map.size_column_value);

    let boundary_json = boundary.and_then(|b| match b.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            logging::warn(Component::Boundary, None, &e.to_string());
            None
        }
    });

    Widgets {
        station_header: format!("Current Station {}", station),
        details: self::table::detail_table(&subset),
        scatter_header: format!("Monitor Channels - {}", station),
        scatter: figures::scatter_figure(&subset, &cfg.style),
        distribution_header: DISTRIBUTION_HEADER,
        bar: figures::bar_figure(&counts, &cfg.style),
        map: figures::map_figure(&map_rows, &cfg.map, boundary_json.as_ref(), &cfg.style),
    }
}

/// Build the halted page for a pipeline error.
pub fn render_halted(err: &DashboardError, cfg: &Config) -> HaltedView {
    HaltedView {
        page_title: PAGE_TITLE,
        stylesheet: cfg.style.stylesheet(),
        message: err.to_string(),
        status: err.status_code(),
    }
}
