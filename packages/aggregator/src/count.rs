//! Incident counting.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use crime_dashboard_dataset_models::Incident;

use crate::normalize::normalize;
use crate::window::RecentWindow;

/// Incident counts keyed by normalized neighborhood name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrimeCounts {
    counts: BTreeMap<String, u64>,
}

impl CrimeCounts {
    /// Count for `key`, or 0 if nothing was counted under it.
    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts, including the unknown bucket.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(key, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn increment(&mut self, key: String) {
        *self.counts.entry(key).or_insert(0) += 1;
    }
}

impl FromIterator<(String, u64)> for CrimeCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Counts incidents per normalized neighborhood key.
///
/// With a `window`, only incidents stamped inside it are counted and
/// incidents without a timestamp are skipped. Without one, every
/// incident counts. Incidents with a missing or blank neighborhood
/// land under [`UNKNOWN_KEY`](crate::UNKNOWN_KEY).
#[must_use]
pub fn count_incidents(
    incidents: &[Incident],
    window: Option<RecentWindow>,
    now: DateTime<Utc>,
) -> CrimeCounts {
    let mut counts = CrimeCounts::default();
    let mut skipped = 0u64;

    for incident in incidents {
        if let Some(window) = window {
            match incident.occurred_at {
                Some(ts) if window.contains(ts, now) => {}
                Some(_) => continue,
                None => {
                    skipped += 1;
                    continue;
                }
            }
        }
        counts.increment(normalize(incident.region.as_deref()));
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} incidents without a timestamp from windowed count");
    }

    counts
}

/// Counts incidents by their raw, un-normalized neighborhood name.
///
/// Diagnostic view of what the incident file actually contains.
/// Incidents without a name are left out.
#[must_use]
pub fn raw_counts(incidents: &[Incident]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for name in incidents.iter().filter_map(|i| i.region.as_ref()) {
        *counts.entry(name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Incidents with a usable location, restricted to `window` when one is
/// given. Under a window, undated incidents are excluded.
pub fn recent_incidents(
    incidents: &[Incident],
    window: Option<RecentWindow>,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &Incident> {
    incidents.iter().filter(move |incident| {
        incident.location.is_some()
            && window.is_none_or(|window| {
                incident
                    .occurred_at
                    .is_some_and(|ts| window.contains(ts, now))
            })
    })
}
