//! Plotly figure specifications for the three charts.
//!
//! Each function returns the `data` + `layout` pair that Plotly.js draws.
//! When color keys a category, every category becomes its own trace, in
//! first-seen order, so the legend doubles as the color key.

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::MapConfig;
use crate::model::{MapRow, MonitorCount, SIZE_COLUMN, STATION_FIELDS, StationRecord};
use crate::render::style::{PLOTLY_PALETTE, SET3_PALETTE, StyleConfig, palette_color};

pub const SCATTER_MARKER_SIZE: u32 = 15;
pub const BAR_TITLE: &str = "Number of Monitoring Items per Station";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn trace_names(&self) -> Vec<&str> {
        self.data
            .iter()
            .filter_map(|t| t.get("name").and_then(Value::as_str))
            .collect()
    }
}

/// Group items by key, keeping first-seen key order and item order.
fn group_by_key<'a, T, F>(items: &'a [T], key: F) -> Vec<(&'a str, Vec<&'a T>)>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut groups: Vec<(&'a str, Vec<&'a T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

fn zero_margin() -> Value {
    json!({ "r": 0, "t": 0, "l": 0, "b": 0 })
}

/// Channel as a number when it parses as one, text otherwise.
fn channel_value(record: &StationRecord) -> Value {
    match record.monitor_channel.as_deref() {
        None => Value::Null,
        Some(text) => match text.trim().parse::<f64>() {
            Ok(n) => json!(n),
            Err(_) => json!(text),
        },
    }
}

// ---------------------------------------------------------------------------
// Scatter: monitor channels of the selected station
// ---------------------------------------------------------------------------

pub fn scatter_figure(rows: &[&StationRecord], style: &StyleConfig) -> Figure {
    let groups = group_by_key(rows, |r| r.full_name());
    let data = groups
        .iter()
        .enumerate()
        .map(|(i, (name, members))| {
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": name,
                "legendgroup": name,
                "showlegend": true,
                "x": members.iter().map(|r| r.full_name()).collect::<Vec<_>>(),
                "y": members.iter().map(|r| channel_value(r)).collect::<Vec<_>>(),
                "marker": {
                    "color": palette_color(&PLOTLY_PALETTE, i),
                    "size": SCATTER_MARKER_SIZE,
                },
            })
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "xaxis": { "title": { "text": "Monitor Full Name" }, "type": "category" },
            "yaxis": { "title": { "text": "Monitor Channel" } },
            "legend": { "title": { "text": "Monitor Full Name" }, "tracegroupgap": 0 },
            "paper_bgcolor": style.chart_background,
            "plot_bgcolor": style.chart_background,
        }),
    }
}

// ---------------------------------------------------------------------------
// Bar: monitor rows per station
// ---------------------------------------------------------------------------

pub fn bar_figure(counts: &[MonitorCount], style: &StyleConfig) -> Figure {
    let data = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            json!({
                "type": "bar",
                "name": c.station_name,
                "legendgroup": c.station_name,
                "showlegend": true,
                "x": [c.station_name],
                "y": [c.monitor_count],
                "marker": { "color": palette_color(&SET3_PALETTE, i) },
            })
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "title": { "text": BAR_TITLE },
            "xaxis": { "title": { "text": "StationName" }, "type": "category" },
            "yaxis": { "title": { "text": "MonitorCount" } },
            "legend": { "title": { "text": "StationName" }, "tracegroupgap": 0 },
            "barmode": "relative",
            "margin": zero_margin(),
            "paper_bgcolor": style.chart_background,
            "plot_bgcolor": style.chart_background,
        }),
    }
}

// ---------------------------------------------------------------------------
// Map: every monitor row as an equal-size bubble
// ---------------------------------------------------------------------------

/// Hover template naming every column, `customdata` supplies the values.
fn map_hover_template() -> String {
    let mut lines: Vec<String> = STATION_FIELDS
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{}=%{{customdata[{}]}}", field, i))
        .collect();
    lines.push(format!("{}=%{{customdata[{}]}}", SIZE_COLUMN, STATION_FIELDS.len()));
    format!("{}<extra></extra>", lines.join("<br>"))
}

pub fn map_figure(
    rows: &[MapRow<'_>],
    map: &MapConfig,
    boundary: Option<&Value>,
    style: &StyleConfig,
) -> Figure {
    let hover = map_hover_template();
    let groups = group_by_key(rows, |r| r.record.short_name());
    let data = groups
        .iter()
        .enumerate()
        .map(|(i, (name, members))| {
            let customdata: Vec<Value> = members
                .iter()
                .map(|r| {
                    let mut cells: Vec<Value> = r.record.cells().into_iter().map(Value::String).collect();
                    cells.push(json!(r.size));
                    Value::Array(cells)
                })
                .collect();
            json!({
                "type": "scattermapbox",
                "mode": "markers",
                "name": name,
                "legendgroup": name,
                "showlegend": true,
                "lat": members.iter().map(|r| r.record.latitude()).collect::<Vec<_>>(),
                "lon": members.iter().map(|r| r.record.longitude()).collect::<Vec<_>>(),
                "customdata": customdata,
                "hovertemplate": hover,
                "marker": {
                    "color": palette_color(&PLOTLY_PALETTE, i),
                    "size": map.marker_size,
                    "symbol": "circle",
                },
            })
        })
        .collect();

    let layers: Vec<Value> = boundary
        .map(|source| {
            vec![json!({
                "sourcetype": "geojson",
                "source": source,
                "type": "line",
                "color": style.accent_color,
                "line": { "width": 1 },
                "below": "traces",
            })]
        })
        .unwrap_or_default();

    Figure {
        data,
        layout: json!({
            "mapbox": {
                "style": map.basemap_style,
                "center": { "lat": map.center_lat, "lon": map.center_lon },
                "zoom": map.zoom,
                "layers": layers,
            },
            "legend": { "title": { "text": "StationShortName" }, "tracegroupgap": 0 },
            "height": map.height,
            "margin": zero_margin(),
            "paper_bgcolor": style.chart_background,
            "plot_bgcolor": style.chart_background,
        }),
    }
}
