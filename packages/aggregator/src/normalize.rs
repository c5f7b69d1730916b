//! Neighborhood name normalization.
//!
//! Boundary files and incident logs rarely agree on case or padding
//! (`"  DOWNTOWN "` vs `"Downtown"`), so both sides are reduced to the
//! same key before joining.

/// Key used for incidents (and regions) that carry no usable name.
pub const UNKNOWN_KEY: &str = "unknown";

/// Normalizes a neighborhood name into a matching key.
///
/// Trims surrounding whitespace and lower-cases. A missing name, or one
/// that is blank after trimming, becomes [`UNKNOWN_KEY`].
#[must_use]
pub fn normalize(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_lowercase(),
        _ => UNKNOWN_KEY.to_string(),
    }
}
