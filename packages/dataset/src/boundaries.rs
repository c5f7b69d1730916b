//! Neighborhood boundary loading.
//!
//! Converts each `GeoJSON` feature into a [`Region`], resolving its display
//! name through the configured [`BoundaryFieldMapping`] and computing the
//! normalized matching key up front.

use std::path::Path;

use crime_dashboard_aggregator::normalize;
use crime_dashboard_dataset_models::{BoundaryFieldMapping, Region, RegionCollection};
use geojson::{Feature, GeoJson, JsonObject};

use crate::DatasetError;

/// Display name for features with no usable name property.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Loads a boundary `FeatureCollection` from `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file is missing, is not valid `GeoJSON`,
/// or is not a `FeatureCollection`.
pub fn load_boundaries(
    path: &Path,
    mapping: &BoundaryFieldMapping,
) -> Result<RegionCollection, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_boundaries(&text, mapping)
}

/// Parses a boundary `FeatureCollection` from `GeoJSON` text.
///
/// # Errors
///
/// Returns [`DatasetError`] if the text is not a valid `GeoJSON`
/// `FeatureCollection`.
pub fn parse_boundaries(
    text: &str,
    mapping: &BoundaryFieldMapping,
) -> Result<RegionCollection, DatasetError> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => {
            return Err(DatasetError::NotFeatureCollection {
                found: "Feature".to_string(),
            });
        }
        GeoJson::Geometry(_) => {
            return Err(DatasetError::NotFeatureCollection {
                found: "Geometry".to_string(),
            });
        }
    };

    let regions = collection
        .features
        .into_iter()
        .map(|feature| to_region(feature, mapping))
        .collect();

    Ok(RegionCollection {
        regions,
        bbox: collection.bbox,
        foreign_members: collection.foreign_members,
    })
}

fn to_region(feature: Feature, mapping: &BoundaryFieldMapping) -> Region {
    let properties = feature.properties.unwrap_or_default();
    let name = region_name(&properties, mapping);

    let unnamed = name.is_none();
    if unnamed {
        log::debug!(
            "Boundary feature {:?} has none of {:?}; using '{UNKNOWN_NAME}'",
            feature.id,
            mapping.name_properties
        );
    }

    let name = name.unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let key = normalize(Some(&name));

    Region {
        name,
        key,
        unnamed,
        id: feature.id,
        bbox: feature.bbox,
        geometry: feature.geometry,
        properties,
    }
}

/// First configured property holding a non-blank string or a number.
fn region_name(properties: &JsonObject, mapping: &BoundaryFieldMapping) -> Option<String> {
    mapping.name_properties.iter().find_map(|field| {
        match properties.get(field)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}
