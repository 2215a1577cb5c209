//! Region boundary overlay.
//!
//! The boundary file is a static GeoJSON shape collection (district
//! outlines). It is read once per page load and only ever drawn as a
//! backdrop under the map markers; it never feeds the station table.

use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;
use std::path::Path;

use crate::model::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    pub collection: FeatureCollection,
}

impl RegionBoundary {
    /// Parse GeoJSON text. A lone feature or geometry is wrapped into a
    /// one-element collection.
    pub fn parse(text: &str) -> Result<RegionBoundary, DashboardError> {
        let geojson = text
            .parse::<GeoJson>()
            .map_err(|e| DashboardError::Boundary(e.to_string()))?;

        let features = match geojson {
            GeoJson::FeatureCollection(collection) => return Ok(RegionBoundary { collection }),
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
        };

        Ok(RegionBoundary {
            collection: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<RegionBoundary, DashboardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Boundary(format!("{}: {}", path.display(), e)))?;
        RegionBoundary::parse(&text)
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// The collection as plain JSON, ready to embed as a map layer source.
    pub fn to_json(&self) -> Result<Value, DashboardError> {
        serde_json::to_value(&self.collection).map_err(|e| DashboardError::Boundary(e.to_string()))
    }
}
