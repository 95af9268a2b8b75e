//! HTTP server module for the sightings dashboard.
//!
//! This module provides an axum-based HTTP server that serves the dashboard
//! page and exposes the filter, aggregates, charts and map as a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON / SVG / HTML responses                            │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │  Arc<RwLock<Dashboard>>
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Dashboard (services::dashboard)                          │
//! │  - Filter state and cross-filter dispatch                 │
//! │  - Aggregation and rendering passes                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Records (parsed once at startup)                         │
//! └──────────────────────────────────────────────────────────┘
//! ```

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
