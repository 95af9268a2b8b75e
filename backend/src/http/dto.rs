//! Data Transfer Objects for the HTTP API.
//!
//! Aggregates, filter state and map commands already derive
//! Serialize/Deserialize and are re-exported from [`crate::api`]; the types
//! below are request and response envelopes.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    AggregateBundle, CoverageReport, FilterState, FilterUpdate, MapCommand, MapMode, PassReport,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Records in the loaded dataset
    pub records: usize,
    /// SHA-256 of the loaded dataset
    pub checksum: String,
}

/// Filter state, and the pass it triggered when it changed.
#[derive(Debug, Clone, Serialize)]
pub struct FilterResponse {
    pub filter: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PassReport>,
}

/// Click on a category of a chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossFilterRequest {
    pub chart: String,
    pub category: String,
}

/// Result of a cross-filter click.
#[derive(Debug, Clone, Serialize)]
pub struct CrossFilterResponse {
    /// False when the chart does not filter anything
    pub applied: bool,
    pub filter: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PassReport>,
}

/// Map overlay to toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    Markers,
    Heat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapModeRequest {
    pub toggle: MapLayer,
}

/// Current map mode and the commands that rebuild the map.
#[derive(Debug, Clone, Serialize)]
pub struct MapResponse {
    pub mode: MapMode,
    pub commands: Vec<MapCommand>,
}

/// Query parameters for the coverage endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageQuery {
    /// Number of top shapes and countries (default 7)
    #[serde(default)]
    pub top: Option<usize>,
    /// Number of sample rows lacking coordinates (default 10)
    #[serde(default)]
    pub samples: Option<usize>,
}
