#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary, incident, and hospital types shared across the dashboard.
//!
//! Also defines the TOML schema that maps logical fields (neighborhood
//! name, timestamp, coordinates, ...) onto the column and property names
//! used by a particular set of input files.

use chrono::{DateTime, Utc};
use geojson::{Bbox, Feature, FeatureCollection, Geometry, JsonObject, feature::Id};
use serde::{Deserialize, Serialize};

/// Property holding a region's display name in annotated output.
pub const NAME_PROPERTY: &str = "name";

/// Property holding a region's incident count in annotated output.
pub const CRIME_COUNT_PROPERTY: &str = "crime_count";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl Coordinates {
    /// Returns a `GeoJSON` point geometry (`[longitude, latitude]` order).
    #[must_use]
    pub fn to_point(self) -> Geometry {
        Geometry::new(geojson::Value::Point(vec![self.longitude, self.latitude]))
    }
}

/// A named neighborhood boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Display name as found in the boundary file (or `"Unknown"`).
    pub name: String,
    /// Normalized matching key (trimmed, lower-cased).
    pub key: String,
    /// Set when the feature had no usable name and `name` is a placeholder.
    /// Such regions never match any incidents.
    pub unnamed: bool,
    /// Feature identifier, carried through unchanged.
    pub id: Option<Id>,
    /// Feature bounding box, carried through unchanged.
    pub bbox: Option<Bbox>,
    /// Polygon geometry. Opaque to the aggregation.
    pub geometry: Option<Geometry>,
    /// Attribute bag. Derived attributes such as `crime_count` land here.
    pub properties: JsonObject,
}

impl Region {
    /// Returns the current `crime_count` attribute, if one has been set.
    #[must_use]
    pub fn crime_count(&self) -> Option<u64> {
        self.properties
            .get(CRIME_COUNT_PROPERTY)
            .and_then(serde_json::Value::as_u64)
    }

    /// Converts the region back into a `GeoJSON` feature.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        Feature {
            bbox: self.bbox.clone(),
            geometry: self.geometry.clone(),
            id: self.id.clone(),
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }
}

/// An ordered collection of regions loaded from one boundary file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionCollection {
    /// Regions in file order.
    pub regions: Vec<Region>,
    /// Collection bounding box, carried through unchanged.
    pub bbox: Option<Bbox>,
    /// Non-standard top-level members (e.g. `name`, `crs`).
    pub foreign_members: Option<JsonObject>,
}

impl RegionCollection {
    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the collection holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Converts the collection into a `GeoJSON` `FeatureCollection`.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: self.bbox.clone(),
            features: self.regions.iter().map(Region::to_feature).collect(),
            foreign_members: self.foreign_members.clone(),
        }
    }
}

/// A single logged crime incident.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Incident {
    /// Raw neighborhood name as logged. `None` when the cell was empty.
    pub region: Option<String>,
    /// When the incident occurred. `None` when missing or unparseable.
    pub occurred_at: Option<DateTime<Utc>>,
    /// Location. `None` when missing, non-finite, or zero.
    pub location: Option<Coordinates>,
    /// Free-text offense category.
    pub category: Option<String>,
}

/// A hospital from the roster file.
#[derive(Debug, Clone, PartialEq)]
pub struct Hospital {
    /// Facility name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// ZIP code, kept as text to preserve leading zeros.
    pub zipcode: Option<String>,
    /// Location. `None` when missing or unparseable.
    pub location: Option<Coordinates>,
}

/// Field mappings for all three input files, deserialized from TOML.
///
/// Every table and key is optional; omitted entries use the defaults
/// documented on each mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Neighborhood boundary file mapping.
    pub boundaries: BoundaryFieldMapping,
    /// Crime incident file mapping.
    pub incidents: IncidentFieldMapping,
    /// Hospital roster mapping.
    pub hospitals: HospitalFieldMapping,
}

/// How to read region names from boundary feature properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryFieldMapping {
    /// Properties tried in order; the first non-empty string wins.
    pub name_properties: Vec<String>,
}

impl Default for BoundaryFieldMapping {
    fn default() -> Self {
        Self {
            name_properties: vec!["Name".to_string(), "Neighborhood".to_string()],
        }
    }
}

/// Column names in the crime incident CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentFieldMapping {
    /// Neighborhood name column (required).
    pub region: String,
    /// Occurrence timestamp column.
    pub occurred_at: String,
    /// Latitude column.
    pub latitude: String,
    /// Longitude column.
    pub longitude: String,
    /// Offense category column.
    pub category: String,
}

impl Default for IncidentFieldMapping {
    fn default() -> Self {
        Self {
            region: "Neighborhood".to_string(),
            occurred_at: "Date".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
            category: "Category".to_string(),
        }
    }
}

/// Column names in the hospital roster CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalFieldMapping {
    /// Facility name column (required).
    pub name: String,
    /// Address column.
    pub address: String,
    /// City column.
    pub city: String,
    /// State column.
    pub state: String,
    /// ZIP code column.
    pub zipcode: String,
    /// Latitude column.
    pub latitude: String,
    /// Longitude column.
    pub longitude: String,
}

impl Default for HospitalFieldMapping {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            address: "address".to_string(),
            city: "city".to_string(),
            state: "state".to_string(),
            zipcode: "zipcode".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}
