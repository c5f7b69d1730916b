#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime-to-neighborhood aggregation.
//!
//! Normalizes neighborhood names, counts incidents per normalized name
//! (optionally restricted to a trailing time window), and attaches the
//! counts to a [`RegionCollection`] as a `crime_count` property. Every
//! operation here is a pure transform over already-loaded data; the
//! caller supplies "now" so windowed results are reproducible.
//!
//! [`RegionCollection`]: crime_dashboard_dataset_models::RegionCollection

pub mod annotate;
pub mod count;
pub mod normalize;
pub mod window;

pub use annotate::annotate;
pub use count::{CrimeCounts, count_incidents, raw_counts, recent_incidents};
pub use normalize::{UNKNOWN_KEY, normalize};
pub use window::{DEFAULT_WINDOW_DAYS, RecentWindow};
