//! Application state for the HTTP server.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::render::map_commands::CommandMapBackend;
use crate::services::dashboard::{dashboard_surface, Dashboard, LoadedDataset};

/// The dashboard shared between handlers. Every mutating request holds the
/// write lock for one full pass.
pub type SharedDashboard = Arc<RwLock<Dashboard<CommandMapBackend>>>;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    /// SHA-256 of the loaded dataset
    pub checksum: Arc<str>,
}

impl AppState {
    /// Create a new application state around an existing dashboard.
    pub fn new(dashboard: Dashboard<CommandMapBackend>, checksum: impl Into<Arc<str>>) -> Self {
        Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            checksum: checksum.into(),
        }
    }

    /// Build the dashboard for a loaded dataset and run the first pass.
    pub fn from_dataset(dataset: LoadedDataset, config: &DashboardConfig) -> Self {
        let mut dashboard = Dashboard::new(
            dataset.records,
            config,
            dashboard_surface(config),
            CommandMapBackend::new(),
        );
        let report = dashboard.refresh();
        log::info!(
            "Initial pass: {} charts rendered, {} failed",
            report.rendered.len(),
            report.failed.len()
        );
        Self::new(dashboard, dataset.checksum)
    }
}
