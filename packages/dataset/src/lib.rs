#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the dashboard's three input files.
//!
//! Neighborhood boundaries come from a `GeoJSON` `FeatureCollection`;
//! crime incidents and hospitals come from CSV. Column and property names
//! are resolved through a [`DatasetConfig`] so differently-shaped exports
//! can be used without code changes. A missing or corrupt file is an
//! error; a malformed value inside an otherwise readable row is not, and
//! simply leaves the corresponding field empty.

pub mod boundaries;
mod columns;
pub mod hospitals;
pub mod incidents;
pub mod parsing;

use std::path::{Path, PathBuf};

use crime_dashboard_dataset_models::{DatasetConfig, Hospital, Incident, RegionCollection};
use thiserror::Error;

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A required column is absent from the CSV header.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// The configured column name.
        column: String,
    },

    /// The boundary file parsed, but is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found a {found}")]
    NotFeatureCollection {
        /// What was found instead.
        found: String,
    },

    /// The dataset config file is not valid TOML for [`DatasetConfig`].
    #[error("Invalid dataset config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    /// Neighborhood boundary `GeoJSON`.
    pub boundaries: PathBuf,
    /// Crime incident CSV.
    pub incidents: PathBuf,
    /// Hospital roster CSV.
    pub hospitals: PathBuf,
}

impl DatasetPaths {
    /// Conventional file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            boundaries: dir.join("neighborhood.geojson"),
            incidents: dir.join("crime.csv"),
            hospitals: dir.join("hospitals.csv"),
        }
    }
}

/// All loaded input data. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    /// Neighborhood boundaries without derived attributes.
    pub boundaries: RegionCollection,
    /// Every incident row, including rows with missing fields.
    pub incidents: Vec<Incident>,
    /// Hospitals from the roster.
    pub hospitals: Vec<Hospital>,
}

impl DataContext {
    /// Loads all three files.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if any file is missing or malformed.
    pub fn load(paths: &DatasetPaths, config: &DatasetConfig) -> Result<Self, DatasetError> {
        let boundaries = boundaries::load_boundaries(&paths.boundaries, &config.boundaries)?;
        log::info!(
            "Loaded {} neighborhoods from {}",
            boundaries.len(),
            paths.boundaries.display()
        );

        let incidents = incidents::load_incidents(&paths.incidents, &config.incidents)?;
        log::info!(
            "Loaded {} incidents from {}",
            incidents.len(),
            paths.incidents.display()
        );

        let hospitals = hospitals::load_hospitals(&paths.hospitals, &config.hospitals)?;
        log::info!(
            "Loaded {} hospitals from {}",
            hospitals.len(),
            paths.hospitals.display()
        );

        Ok(Self {
            boundaries,
            incidents,
            hospitals,
        })
    }
}

/// Reads a [`DatasetConfig`] from a TOML file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or is not valid.
pub fn load_config(path: &Path) -> Result<DatasetConfig, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

pub(crate) fn open(path: &Path) -> Result<std::fs::File, DatasetError> {
    std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
