//! Dashboard configuration file and environment handling.
//!
//! Every table and key has a default, so an empty `dashboard.toml` (or no file
//! at all) yields a working configuration for the NUFORC export.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, AnalyticsResult, ErrorContext};

/// Dashboard configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub columns: ColumnMap,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub map: MapSettings,
}

/// Where the dataset lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSettings {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("database/nuforc-2025-07-02_with_coords.csv")
}

/// Names of the dataset columns read by the record mapper.
///
/// Coordinates may appear under either naming convention; the long name wins
/// when both are present and non-blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub occurred: String,
    pub reported: String,
    pub shape: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub latitude: String,
    pub latitude_short: String,
    pub longitude: String,
    pub longitude_short: String,
    pub has_image: String,
    pub summary: String,
    pub explanation: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            occurred: "column-occurred".to_string(),
            reported: "column-reported".to_string(),
            shape: "column-shape".to_string(),
            country: "column-country".to_string(),
            state: "column-state".to_string(),
            city: "column-city".to_string(),
            latitude: "latitude".to_string(),
            latitude_short: "lat".to_string(),
            longitude: "longitude".to_string(),
            longitude_short: "lon".to_string(),
            has_image: "column-hasimage".to_string(),
            summary: "column-summary".to_string(),
            explanation: "column-explanation".to_string(),
        }
    }
}

/// Aggregation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Length of every Top-N list
    pub top_n: usize,
    /// Cap on the coordinate sample fed to the scatter plot and the map
    pub sample_size: usize,
    /// Number of shapes broken down per decade
    pub shape_decade_shapes: usize,
    /// Country whose records carry a meaningful state/province
    pub domestic_country: String,
    /// Sentinel pair meaning "country known, exact location unknown"
    pub placeholder_latitude: f64,
    pub placeholder_longitude: f64,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            sample_size: 500,
            shape_decade_shapes: 5,
            domestic_country: "USA".to_string(),
            placeholder_latitude: 37.0902,
            placeholder_longitude: -95.7129,
        }
    }
}

/// Chart drawing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub palette: Vec<String>,
    /// Above this many categories only every Nth x-axis label is drawn
    pub label_threshold: usize,
    pub chart_width: f64,
    pub chart_height: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            palette: vec![
                "#1f77b4".to_string(),
                "#ff7f0e".to_string(),
                "#2ca02c".to_string(),
                "#d62728".to_string(),
                "#9467bd".to_string(),
                "#8c564b".to_string(),
                "#e377c2".to_string(),
                "#7f7f7f".to_string(),
                "#bcbd22".to_string(),
                "#17becf".to_string(),
            ],
            label_threshold: 12,
            chart_width: 640.0,
            chart_height: 320.0,
        }
    }
}

/// Map adapter parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Default view used when there is nothing to show
    pub center: [f64; 2],
    pub zoom: u8,
    /// Group markers into clusters instead of drawing each one
    pub cluster_markers: bool,
    pub heat_radius: u32,
    pub heat_blur: u32,
    pub fit_padding: u32,
    pub tile_url: String,
    pub attribution: String,
    pub width: f64,
    pub height: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: [20.0, 0.0],
            zoom: 2,
            cluster_markers: true,
            heat_radius: 25,
            heat_blur: 15,
            fit_padding: 20,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            width: 960.0,
            height: 480.0,
        }
    }
}

impl DashboardConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let path = path.as_ref();
        let context = ErrorContext::new("read_config").with_entity(path.display().to_string());

        let content = fs::read_to_string(path).map_err(|e| {
            AnalyticsError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                context.clone(),
            )
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            AnalyticsError::Configuration { message, .. } => {
                AnalyticsError::configuration_with_context(message, context)
            }
            other => other,
        })
    }

    /// Parse the configuration from TOML text.
    pub fn from_toml_str(content: &str) -> AnalyticsResult<Self> {
        toml::from_str(content).map_err(|e| {
            AnalyticsError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load the configuration from the default location.
    ///
    /// Searches for `dashboard.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> AnalyticsResult<Self> {
        let search_paths = [
            PathBuf::from("dashboard.toml"),
            PathBuf::from("backend/dashboard.toml"),
            PathBuf::from("../dashboard.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(AnalyticsError::configuration(
            "No dashboard.toml found in standard locations",
        ))
    }
}

/// Server settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Explicit config file (`DASHBOARD_CONFIG`)
    pub config_path: Option<PathBuf>,
    /// Dataset override (`DATASET_PATH`)
    pub dataset_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Create the server configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 8080)
    /// - `DASHBOARD_CONFIG` (optional): path to a `dashboard.toml`
    /// - `DATASET_PATH` (optional): overrides `[dataset] path`
    ///
    /// # Errors
    /// Returns an error if `PORT` is not a valid port number.
    pub fn from_env() -> AnalyticsResult<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| AnalyticsError::configuration("PORT must be a valid port number"))?;
        let config_path = env::var("DASHBOARD_CONFIG").ok().map(PathBuf::from);
        let dataset_path = env::var("DATASET_PATH").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            config_path,
            dataset_path,
        })
    }

    /// Resolve the dashboard configuration: explicit file, else default
    /// location, else built-in defaults. `DATASET_PATH` is applied last.
    pub fn dashboard_config(&self) -> AnalyticsResult<DashboardConfig> {
        let mut config = match &self.config_path {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::from_default_location().unwrap_or_else(|e| {
                log::info!("{}; using built-in defaults", e);
                DashboardConfig::default()
            }),
        };
        if let Some(path) = &self.dataset_path {
            config.dataset.path = path.clone();
        }
        Ok(config)
    }
}
