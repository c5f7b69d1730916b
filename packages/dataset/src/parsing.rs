//! Shared value parsing for the CSV loaders.
//!
//! Timestamp and coordinate parsing are lenient: anything that does not
//! parse becomes `None` rather than an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crime_dashboard_dataset_models::Coordinates;

/// Naive date-time layouts tried in order. Values are taken as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses an incident timestamp.
///
/// Accepts RFC 3339 (with offset), the common naive layouts exported by
/// city open-data portals, and bare dates.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

/// Parses lat/lng strings. Returns `None` if either is missing,
/// unparseable, non-finite, or zero.
#[must_use]
pub fn parse_coordinates(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some(Coordinates {
        latitude,
        longitude,
    })
}
