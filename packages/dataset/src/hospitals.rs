//! Hospital roster CSV loading.

use std::io::Read;
use std::path::Path;

use crime_dashboard_dataset_models::{Hospital, HospitalFieldMapping};

use crate::DatasetError;
use crate::columns;
use crate::parsing::parse_coordinates;

/// Loads hospitals from the CSV at `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file is missing, the name column is
/// absent, or a record cannot be decoded.
pub fn load_hospitals(
    path: &Path,
    mapping: &HospitalFieldMapping,
) -> Result<Vec<Hospital>, DatasetError> {
    read_hospitals(crate::open(path)?, mapping)
}

/// Reads hospitals from any CSV reader. Rows with a blank name are
/// skipped.
///
/// # Errors
///
/// Returns [`DatasetError`] if the name column is absent or a record
/// cannot be decoded.
pub fn read_hospitals<R: Read>(
    reader: R,
    mapping: &HospitalFieldMapping,
) -> Result<Vec<Hospital>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let name_col = columns::require(&headers, &mapping.name)?;
    let address_col = columns::optional(&headers, &mapping.address, "hospitals");
    let city_col = columns::optional(&headers, &mapping.city, "hospitals");
    let state_col = columns::optional(&headers, &mapping.state, "hospitals");
    let zipcode_col = columns::optional(&headers, &mapping.zipcode, "hospitals");
    let lat_col = columns::optional(&headers, &mapping.latitude, "hospitals");
    let lng_col = columns::optional(&headers, &mapping.longitude, "hospitals");

    let mut hospitals = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let Some(name) = columns::cell(&record, Some(name_col)) else {
            log::debug!("hospitals row {}: blank name, skipping", row + 2);
            continue;
        };

        let text = |col| columns::cell(&record, col).map(str::to_string);

        hospitals.push(Hospital {
            name: name.to_string(),
            address: text(address_col),
            city: text(city_col),
            state: text(state_col),
            zipcode: text(zipcode_col),
            location: parse_coordinates(
                columns::cell(&record, lat_col),
                columns::cell(&record, lng_col),
            ),
        });
    }

    Ok(hospitals)
}
