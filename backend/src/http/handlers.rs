//! HTTP handlers for the REST API.
//!
//! Reads take the dashboard's read lock. Anything that runs a pass takes the
//! write lock inside `spawn_blocking`, so a pass never stalls the runtime.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

use super::dto::{
    AggregateBundle, CoverageQuery, CoverageReport, CrossFilterRequest, CrossFilterResponse,
    FilterResponse, FilterUpdate, HealthResponse, MapLayer, MapMode, MapModeRequest, MapResponse,
};
use super::error::AppError;
use super::state::{AppState, SharedDashboard};
use crate::render::map_commands::CommandMapBackend;
use crate::render::page::{render_page, Page};
use crate::services::coverage::coverage_report;
use crate::services::dashboard::{chart_ids, Dashboard};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const PAGE_TITLE: &str = "UFO Sightings";

/// Run `f` against the dashboard under the write lock on the blocking pool.
async fn with_dashboard<T, F>(dashboard: &SharedDashboard, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut Dashboard<CommandMapBackend>) -> T + Send + 'static,
{
    let dashboard = Arc::clone(dashboard);
    tokio::task::spawn_blocking(move || f(&mut dashboard.write()))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let records = state.dashboard.read().records().len();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        records,
        checksum: state.checksum.to_string(),
    }))
}

// =============================================================================
// Page
// =============================================================================

/// GET /
///
/// The full dashboard: every chart as SVG plus the map command log.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let dashboard = state.dashboard.read();
    let commands = dashboard.map_backend().snapshot();
    let page = Page {
        title: PAGE_TITLE,
        surface: dashboard.surface(),
        charts: &chart_ids::CHARTS,
        map_container: chart_ids::MAP,
        map_commands: &commands,
        filter: dashboard.filter(),
        checksum: &state.checksum,
    };
    let html = render_page(&page)?;
    Ok(Html(html))
}

// =============================================================================
// Aggregates and filter
// =============================================================================

/// GET /v1/aggregates
pub async fn get_aggregates(State(state): State<AppState>) -> HandlerResult<AggregateBundle> {
    Ok(Json(state.dashboard.read().bundle().clone()))
}

/// GET /v1/filter
pub async fn get_filter(State(state): State<AppState>) -> HandlerResult<FilterResponse> {
    Ok(Json(FilterResponse {
        filter: state.dashboard.read().filter().clone(),
        report: None,
    }))
}

/// PUT /v1/filter
///
/// Apply an explicit filter change and run one pass.
///
/// The date range is checked after merging the change into the current
/// filter; an inverted range leaves the filter untouched.
pub async fn put_filter(
    State(state): State<AppState>,
    Json(update): Json<FilterUpdate>,
) -> HandlerResult<FilterResponse> {
    let (filter, report) = with_dashboard(&state.dashboard, move |dashboard| {
        let mut merged = dashboard.filter().clone();
        merged.apply(update.clone());
        if let (Some(start), Some(end)) = (merged.start, merged.end) {
            if start > end {
                return Err(AppError::BadRequest(format!(
                    "start {} is after end {}",
                    start, end
                )));
            }
        }
        let report = dashboard.apply_filter(update);
        Ok((dashboard.filter().clone(), report))
    })
    .await??;

    Ok(Json(FilterResponse {
        filter,
        report: Some(report),
    }))
}

/// POST /v1/cross-filter
///
/// Click on a category of a chart. Charts without a filter dimension are a
/// no-op.
pub async fn post_cross_filter(
    State(state): State<AppState>,
    Json(request): Json<CrossFilterRequest>,
) -> HandlerResult<CrossFilterResponse> {
    let category = request.category.trim().to_string();
    if category.is_empty() {
        return Err(AppError::BadRequest("category must not be empty".to_string()));
    }
    let known = state.dashboard.read().surface().contains(&request.chart);
    if !known {
        return Err(AppError::NotFound(format!("chart '{}'", request.chart)));
    }

    let chart = request.chart;
    let (filter, report) = with_dashboard(&state.dashboard, move |dashboard| {
        let report = dashboard.click(&chart, &category);
        (dashboard.filter().clone(), report)
    })
    .await?;

    Ok(Json(CrossFilterResponse {
        applied: report.is_some(),
        filter,
        report,
    }))
}

// =============================================================================
// Charts and map
// =============================================================================

/// GET /v1/charts/{chart_id}
///
/// One chart container as SVG.
pub async fn get_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let svg = state
        .dashboard
        .read()
        .surface()
        .to_svg(&chart_id)
        .ok_or_else(|| AppError::NotFound(format!("chart '{}'", chart_id)))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// GET /v1/map
pub async fn get_map(State(state): State<AppState>) -> HandlerResult<MapResponse> {
    let dashboard = state.dashboard.read();
    Ok(Json(MapResponse {
        mode: dashboard.map_mode(),
        commands: dashboard.map_backend().snapshot(),
    }))
}

/// POST /v1/map/mode
///
/// Toggle the marker or heat overlay and redraw the map.
pub async fn post_map_mode(
    State(state): State<AppState>,
    Json(request): Json<MapModeRequest>,
) -> HandlerResult<MapMode> {
    let mode = with_dashboard(&state.dashboard, move |dashboard| match request.toggle {
        MapLayer::Markers => dashboard.toggle_map_markers(),
        MapLayer::Heat => dashboard.toggle_map_heat(),
    })
    .await?;
    Ok(Json(mode))
}

// =============================================================================
// Coverage
// =============================================================================

/// GET /v1/coverage
///
/// Coordinate coverage over the whole dataset (the filter is ignored).
pub async fn get_coverage(
    State(state): State<AppState>,
    Query(query): Query<CoverageQuery>,
) -> HandlerResult<CoverageReport> {
    let top = query.top.unwrap_or(7);
    let samples = query.samples.unwrap_or(10);
    let report = coverage_report(state.dashboard.read().records(), top, samples);
    Ok(Json(report))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod handlers_tests;
