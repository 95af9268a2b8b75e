//! # Sightings Analytics
//!
//! Cross-filterable analytics dashboard over a CSV dump of UFO sighting
//! reports.
//!
//! The dataset is parsed once into typed [`models::Record`]s. Every filter
//! change or chart click then runs one synchronous pass: the filter selects a
//! subset, the aggregator computes a fresh bundle of metrics, and every chart
//! and the map are redrawn.
//!
//! ## Architecture
//!
//! - [`parsing`]: delimited text to raw rows, raw rows to records, dataset checksum
//! - [`models`]: records, coordinates and coordinate quality, timestamp parsing
//! - [`services`]: aggregation, filter state, coverage tools, the dashboard orchestrator
//! - [`render`]: chart renderers over an in-memory surface, the map adapter, the page
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: TOML dashboard configuration and server environment
//!
//! ## Logging
//!
//! The library logs through the `log` facade. Binaries install a
//! `tracing-subscriber`, which picks those records up.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod render;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(test)]
mod test_fixtures;
