//! Crime incident CSV loading.

use std::io::Read;
use std::path::Path;

use crime_dashboard_dataset_models::{Incident, IncidentFieldMapping};

use crate::DatasetError;
use crate::columns;
use crate::parsing::{parse_coordinates, parse_timestamp};

/// Loads every incident row from the CSV at `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file is missing, the neighborhood
/// column is absent, or a record cannot be decoded.
pub fn load_incidents(
    path: &Path,
    mapping: &IncidentFieldMapping,
) -> Result<Vec<Incident>, DatasetError> {
    read_incidents(crate::open(path)?, mapping)
}

/// Reads incident rows from any CSV reader.
///
/// Only the neighborhood column is required. A timestamp or coordinate
/// that does not parse leaves that field `None` for the row; the row is
/// still kept. The neighborhood name is kept exactly as written, so
/// padded or oddly-cased names survive for diagnostics.
///
/// # Errors
///
/// Returns [`DatasetError`] if the neighborhood column is absent or a
/// record cannot be decoded.
pub fn read_incidents<R: Read>(
    reader: R,
    mapping: &IncidentFieldMapping,
) -> Result<Vec<Incident>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let region_col = columns::require(&headers, &mapping.region)?;
    let occurred_col = columns::optional(&headers, &mapping.occurred_at, "incidents");
    let lat_col = columns::optional(&headers, &mapping.latitude, "incidents");
    let lng_col = columns::optional(&headers, &mapping.longitude, "incidents");
    let category_col = columns::find(&headers, &mapping.category);

    let mut incidents = Vec::new();
    let mut bad_timestamps = 0u64;

    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let region = record
            .get(region_col)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let raw_timestamp = columns::cell(&record, occurred_col);
        let occurred_at = raw_timestamp.and_then(parse_timestamp);
        if let Some(raw) = raw_timestamp
            && occurred_at.is_none()
        {
            bad_timestamps += 1;
            log::debug!("incidents row {}: unparseable timestamp {raw:?}", row + 2);
        }

        let location = parse_coordinates(
            columns::cell(&record, lat_col),
            columns::cell(&record, lng_col),
        );

        incidents.push(Incident {
            region,
            occurred_at,
            location,
            category: columns::cell(&record, category_col).map(str::to_string),
        });
    }

    if bad_timestamps > 0 {
        log::warn!("{bad_timestamps} incident rows have unparseable timestamps");
    }

    Ok(incidents)
}
