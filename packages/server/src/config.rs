//! Server configuration from environment variables.

use std::path::PathBuf;

use crime_dashboard_aggregator::{DEFAULT_WINDOW_DAYS, RecentWindow};
use crime_dashboard_dataset::DatasetPaths;

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Input file locations.
    pub paths: DatasetPaths,
    /// Optional TOML file with column/property mappings.
    pub dataset_config: Option<PathBuf>,
    /// Default window for `/api/neighborhoods`. `None` counts all time.
    pub neighborhood_window: Option<RecentWindow>,
    /// Default window for `/api/hotspots`.
    pub hotspot_window: RecentWindow,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through `lookup`.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `BIND_ADDR` | `127.0.0.1` |
    /// | `PORT` | `8080` |
    /// | `DATA_DIR` | `data` |
    /// | `NEIGHBORHOODS_PATH` | `$DATA_DIR/neighborhood.geojson` |
    /// | `CRIMES_PATH` | `$DATA_DIR/crime.csv` |
    /// | `HOSPITALS_PATH` | `$DATA_DIR/hospitals.csv` |
    /// | `DATASET_CONFIG` | unset |
    /// | `NEIGHBORHOOD_WINDOW_DAYS` | unset (all time) |
    /// | `HOTSPOT_WINDOW_DAYS` | `7` |
    ///
    /// Unparseable numbers fall back to the default with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()));
        let defaults = DatasetPaths::in_dir(&data_dir);

        let paths = DatasetPaths {
            boundaries: lookup("NEIGHBORHOODS_PATH").map_or(defaults.boundaries, PathBuf::from),
            incidents: lookup("CRIMES_PATH").map_or(defaults.incidents, PathBuf::from),
            hospitals: lookup("HOSPITALS_PATH").map_or(defaults.hospitals, PathBuf::from),
        };

        let neighborhood_window = parse_number::<u32>(&lookup, "NEIGHBORHOOD_WINDOW_DAYS")
            .filter(|days| *days > 0)
            .map(RecentWindow::days);

        let hotspot_window = RecentWindow::days(
            parse_number(&lookup, "HOTSPOT_WINDOW_DAYS").unwrap_or(DEFAULT_WINDOW_DAYS),
        );

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_number(&lookup, "PORT").unwrap_or(8080),
            paths,
            dataset_config: lookup("DATASET_CONFIG").map(PathBuf::from),
            neighborhood_window,
            hotspot_window,
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring invalid {key}={raw:?}");
    }
    parsed
}
