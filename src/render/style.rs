//! Page styling as plain configuration.
//!
//! Colors and spacing live in `StyleConfig`, which is rendered into the
//! page's stylesheet. Chart palettes are fixed.

use serde::{Deserialize, Serialize};

/// Plotly's default qualitative sequence, used when color keys a category.
pub const PLOTLY_PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// ColorBrewer Set3, used for the per-station bars.
pub const SET3_PALETTE: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

/// Color for the `index`th category, cycling through `palette`.
pub fn palette_color<'a>(palette: &[&'a str], index: usize) -> &'a str {
    palette[index % palette.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Selector, table header, and boundary line color.
    pub accent_color: String,
    pub header_text_color: String,
    pub odd_row_color: String,
    pub even_row_color: String,
    pub cell_padding_px: u32,
    /// Chart paper and plot background.
    pub chart_background: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            accent_color: "#0c6e6e".to_string(),
            header_text_color: "white".to_string(),
            odd_row_color: "#f2f2f2".to_string(),
            even_row_color: "#ffffff".to_string(),
            cell_padding_px: 10,
            chart_background: "rgba(0,0,0,0)".to_string(),
        }
    }
}

impl StyleConfig {
    pub fn stylesheet(&self) -> String {
        format!(
            r#"body {{ font-family: sans-serif; margin: 0 auto; max-width: 96%; }}
.station-selector label {{ color: {accent}; font-weight: bold; }}
.station-selector select {{ background: {accent}; color: {header_text}; padding: {pad}px; border-radius: 5px; font-weight: bold; }}
.details {{ overflow-x: auto; width: 100%; margin-bottom: 2rem; }}
table {{ width: 100%; border-collapse: collapse; }}
thead th {{ background-color: {accent}; color: {header_text}; padding: {pad}px; }}
tbody tr:nth-child(odd) {{ background-color: {odd}; }}
tbody tr:nth-child(even) {{ background-color: {even}; }}
tbody td {{ padding: {pad}px; }}
.notice {{ border-left: 4px solid {accent}; padding: 0.5rem 1rem; }}
.error {{ border-left: 4px solid #b00020; background: #fdecea; padding: 0.5rem 1rem; }}
"#,
            accent = self.accent_color,
            header_text = self.header_text_color,
            pad = self.cell_padding_px,
            odd = self.odd_row_color,
            even = self.even_row_color,
        )
    }
}
