//! Builds the point `FeatureCollection`s returned by the API.

use chrono::SecondsFormat;
use crime_dashboard_dataset_models::{Coordinates, Hospital, Incident};
use crime_dashboard_server_models::{HospitalProperties, HotspotProperties};
use crime_dashboard_simulate::{INTENSITY_RANGE, OCCUPANCY_RANGE, ValueGenerator};
use geojson::{Feature, FeatureCollection, JsonObject};
use serde::Serialize;

/// One point feature per hospital with a usable location, each with a
/// simulated `occupancy`.
#[must_use]
pub fn hospital_collection(
    hospitals: &[Hospital],
    generator: &dyn ValueGenerator,
) -> FeatureCollection {
    let features = hospitals
        .iter()
        .filter_map(|hospital| {
            let Some(location) = hospital.location else {
                log::debug!("Hospital {:?} has no location, skipping", hospital.name);
                return None;
            };
            let properties = HospitalProperties {
                name: hospital.name.clone(),
                address: hospital.address.clone(),
                city: hospital.city.clone(),
                state: hospital.state.clone(),
                zipcode: hospital.zipcode.clone(),
                occupancy: generator.sample(OCCUPANCY_RANGE),
            };
            Some(point_feature(location, &properties))
        })
        .collect();

    collection(features)
}

/// One point feature per incident, each with a simulated `intensity`.
/// Incidents without a location are skipped.
#[must_use]
pub fn hotspot_collection<'a>(
    incidents: impl Iterator<Item = &'a Incident>,
    generator: &dyn ValueGenerator,
) -> FeatureCollection {
    let features = incidents
        .filter_map(|incident| {
            let location = incident.location?;
            let properties = HotspotProperties {
                intensity: generator.sample(INTENSITY_RANGE),
                neighborhood: incident.region.clone(),
                occurred_at: incident
                    .occurred_at
                    .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
                category: incident.category.clone(),
            };
            Some(point_feature(location, &properties))
        })
        .collect();

    collection(features)
}

fn point_feature(location: Coordinates, properties: &impl Serialize) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(location.to_point()),
        id: None,
        properties: to_object(properties),
        foreign_members: None,
    }
}

fn to_object(value: &impl Serialize) -> Option<JsonObject> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            log::error!("Failed to serialize feature properties: {e}");
            None
        }
    }
}

const fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
