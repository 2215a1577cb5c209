//! Detail table for the selected station.

use serde::Serialize;

use crate::model::{STATION_FIELDS, StationRecord};

/// All columns of the selected station's rows. No index column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

pub fn detail_table(rows: &[&StationRecord]) -> DetailTable {
    DetailTable {
        columns: STATION_FIELDS.to_vec(),
        rows: rows.iter().map(|r| r.cells()).collect(),
    }
}
