//! CSV header lookup.

use csv::StringRecord;

use crate::DatasetError;

/// Position of `name` in `headers`, ignoring surrounding whitespace and a
/// leading byte-order mark.
pub fn find(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

/// Like [`find`], but a missing column is an error.
pub fn require(headers: &StringRecord, name: &str) -> Result<usize, DatasetError> {
    find(headers, name).ok_or_else(|| DatasetError::MissingColumn {
        column: name.to_string(),
    })
}

/// Like [`find`], but logs when an optional column is absent.
pub fn optional(headers: &StringRecord, name: &str, file: &str) -> Option<usize> {
    let index = find(headers, name);
    if index.is_none() {
        log::warn!("{file}: column '{name}' not found; field will be empty for every row");
    }
    index
}

/// Non-empty trimmed cell at `index`.
pub fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    record
        .get(index?)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
