//! Attaches incident counts to neighborhood boundaries.

use crime_dashboard_dataset_models::{CRIME_COUNT_PROPERTY, NAME_PROPERTY, RegionCollection};

use crate::count::CrimeCounts;

/// Returns a copy of `regions` with `name` and `crime_count` set on every
/// region's properties.
///
/// Regions with no matching key get `crime_count = 0`. A region whose name
/// was a placeholder never picks up any count. Counts whose key matches no
/// region are dropped.
#[must_use]
pub fn annotate(regions: &RegionCollection, counts: &CrimeCounts) -> RegionCollection {
    let mut annotated = regions.clone();

    for region in &mut annotated.regions {
        let count = if region.unnamed {
            0
        } else {
            counts.get(&region.key)
        };
        region
            .properties
            .insert(NAME_PROPERTY.to_string(), region.name.clone().into());
        region
            .properties
            .insert(CRIME_COUNT_PROPERTY.to_string(), count.into());
    }

    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UNKNOWN_KEY, count_incidents, normalize};
    use chrono::Utc;
    use crime_dashboard_dataset_models::{Incident, Region};

    fn region(name: &str) -> Region {
        Region {
            name: name.to_string(),
            key: normalize(Some(name)),
            unnamed: false,
            id: None,
            bbox: None,
            geometry: None,
            properties: serde_json::Map::new(),
        }
    }

    fn collection(names: &[&str]) -> RegionCollection {
        RegionCollection {
            regions: names.iter().map(|n| region(n)).collect(),
            bbox: None,
            foreign_members: None,
        }
    }

    fn incidents(names: &[Option<&str>]) -> Vec<Incident> {
        names
            .iter()
            .map(|n| Incident {
                region: n.map(str::to_string),
                ..Incident::default()
            })
            .collect()
    }

    #[test]
    fn joins_counts_onto_regions() {
        let regions = collection(&["Downtown", "Midtown"]);
        let counts = count_incidents(
            &incidents(&[Some("  DOWNTOWN "), Some("downtown"), Some("Uptown")]),
            None,
            Utc::now(),
        );

        let annotated = annotate(&regions, &counts);

        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated.regions[0].crime_count(), Some(2));
        assert_eq!(annotated.regions[1].crime_count(), Some(0));
        assert!(
            annotated
                .regions
                .iter()
                .all(|r| r.name != "Uptown" && r.key != "uptown")
        );
    }

    #[test]
    fn every_region_gets_a_count() {
        let regions = collection(&["Shaw", "Brookland", "Navy Yard"]);
        let annotated = annotate(&regions, &CrimeCounts::default());
        for region in &annotated.regions {
            assert_eq!(region.crime_count(), Some(0), "{} missing count", region.name);
            assert_eq!(
                region.properties.get(NAME_PROPERTY),
                Some(&serde_json::json!(region.name))
            );
        }
    }

    #[test]
    fn matched_sum_equals_region_total() {
        let regions = collection(&["Shaw", "Brookland"]);
        let raw = incidents(&[
            Some("shaw"),
            Some("SHAW "),
            Some("Brookland"),
            Some("Anacostia"),
            None,
        ]);
        let counts = count_incidents(&raw, None, Utc::now());
        let annotated = annotate(&regions, &counts);

        let region_sum: u64 = annotated.regions.iter().filter_map(|r| r.crime_count()).sum();
        let matched = raw
            .iter()
            .filter(|i| {
                let key = normalize(i.region.as_deref());
                regions.regions.iter().any(|r| r.key == key && key != UNKNOWN_KEY)
            })
            .count() as u64;
        assert_eq!(region_sum, matched);
        assert_eq!(region_sum, 3);
    }

    #[test]
    fn nameless_region_ignores_unknown_bucket() {
        let mut nameless = region("Unknown");
        nameless.unnamed = true;
        let regions = RegionCollection {
            regions: vec![nameless],
            bbox: None,
            foreign_members: None,
        };
        let counts = count_incidents(
            &incidents(&[None, Some("  "), Some("Unknown")]),
            None,
            Utc::now(),
        );

        let annotated = annotate(&regions, &counts);

        assert_eq!(annotated.regions[0].crime_count(), Some(0));
    }

    #[test]
    fn region_literally_named_unknown_is_counted() {
        let regions = collection(&["Unknown", "Shaw"]);
        assert_eq!(regions.regions[0].key, UNKNOWN_KEY);
        let counts = count_incidents(
            &incidents(&[Some("Unknown"), Some("unknown "), Some("Shaw")]),
            None,
            Utc::now(),
        );

        let annotated = annotate(&regions, &counts);

        assert_eq!(annotated.regions[0].crime_count(), Some(2));
        assert_eq!(annotated.regions[1].crime_count(), Some(1));
    }

    #[test]
    fn overwrites_existing_count_and_keeps_other_properties() {
        let mut shaw = region("Shaw");
        shaw.properties.insert(CRIME_COUNT_PROPERTY.to_string(), 99.into());
        shaw.properties.insert("OBJECTID".to_string(), 12.into());
        let regions = RegionCollection {
            regions: vec![shaw],
            bbox: None,
            foreign_members: None,
        };
        let counts = count_incidents(&incidents(&[Some("Shaw")]), None, Utc::now());

        let annotated = annotate(&regions, &counts);

        assert_eq!(annotated.regions[0].crime_count(), Some(1));
        assert_eq!(
            annotated.regions[0].properties.get("OBJECTID"),
            Some(&serde_json::json!(12))
        );
        assert_eq!(regions.regions[0].crime_count(), Some(99));
    }
}
