//! Dashboard orchestration.
//!
//! [`Dashboard`] owns the parsed records, the filter, the current aggregate
//! bundle, the drawing surface and the map adapter. Every state change runs
//! one full pass: filter, aggregate, render every chart, render the map.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{AnalyticsSettings, DashboardConfig};
use crate::error::{AnalyticsError, AnalyticsResult, RenderError};
use crate::models::Record;
use crate::parsing::{calculate_checksum, parse_records};
use crate::render::chart::{AxisTitles, ChartStyle, Datum, LineSeries, RenderOutcome};
use crate::render::map::{MapBackend, MapMode, MapRenderer};
use crate::render::surface::Surface;
use crate::render::{
    render_bar, render_donut, render_hbar, render_heatmap, render_line, render_radial,
    render_scatter, render_stacked,
};
use crate::services::aggregate::{aggregate, AggregateBundle, LabelCount};
use crate::services::filter::{CrossFilterTable, Dimension, FilterState, FilterUpdate};

/// Stable container ids of every chart on the page.
pub mod chart_ids {
    pub const SHAPES: &str = "shapes";
    pub const SHAPE_DONUT: &str = "shape-donut";
    pub const COUNTRIES: &str = "countries";
    pub const STATES: &str = "states";
    pub const CITIES: &str = "cities";
    pub const YEARS: &str = "years";
    pub const CUMULATIVE: &str = "cumulative";
    pub const MONTHS: &str = "months";
    pub const WEEKDAYS: &str = "weekdays";
    pub const HOURS: &str = "hours";
    pub const DECADES: &str = "decades";
    pub const DELAYS: &str = "delays";
    pub const DELAY_BY_COUNTRY: &str = "delay-by-country";
    pub const DELAY_BY_YEAR: &str = "delay-by-year";
    pub const MONTH_HOUR: &str = "month-hour";
    pub const SHAPE_DECADE: &str = "shape-decade";
    pub const HEMISPHERES: &str = "hemispheres";
    pub const COORDINATE_QUALITY: &str = "coordinate-quality";
    pub const IMAGES: &str = "images";
    pub const SCATTER: &str = "scatter";
    pub const MAP: &str = "map";

    /// Chart containers in display order (the map is separate).
    pub const CHARTS: [&str; 20] = [
        SHAPES,
        SHAPE_DONUT,
        COUNTRIES,
        STATES,
        CITIES,
        YEARS,
        CUMULATIVE,
        MONTHS,
        WEEKDAYS,
        HOURS,
        DECADES,
        DELAYS,
        DELAY_BY_COUNTRY,
        DELAY_BY_YEAR,
        MONTH_HOUR,
        SHAPE_DECADE,
        HEMISPHERES,
        COORDINATE_QUALITY,
        IMAGES,
        SCATTER,
    ];
}

/// A dataset read from disk and parsed.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub records: Vec<Record>,
    /// SHA-256 of the file content
    pub checksum: String,
}

/// Read and parse the dataset.
///
/// # Arguments
/// * `path` - CSV file to read
/// * `config` - Column names and analytics settings used for parsing
///
/// # Returns
/// * The parsed records and the file checksum, or `AnalyticsError::Load` when
///   the file cannot be read. There is no retry.
pub async fn load_dataset(
    path: impl AsRef<Path>,
    config: &DashboardConfig,
) -> AnalyticsResult<LoadedDataset> {
    let path = path.as_ref();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            let error = AnalyticsError::load(path, e);
            log::error!("{}", error);
            return Err(error);
        }
    };

    let checksum = calculate_checksum(&text);
    let records = parse_records(&text, &config.columns, &config.analytics);
    log::info!(
        "Loaded {} records from {} (checksum {})",
        records.len(),
        path.display(),
        &checksum[..12.min(checksum.len())]
    );

    Ok(LoadedDataset {
        path: path.to_path_buf(),
        records,
        checksum,
    })
}

/// A renderer that returned an error during a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFailure {
    pub chart: String,
    pub message: String,
}

/// What happened during one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    /// 1-based pass counter
    pub pass: u64,
    pub filtered_records: usize,
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<ChartFailure>,
}

impl PassReport {
    fn record(&mut self, chart: &str, result: Result<RenderOutcome, RenderError>) {
        match result {
            Ok(RenderOutcome::Rendered { .. }) => self.rendered.push(chart.to_string()),
            Ok(RenderOutcome::Skipped) => self.skipped.push(chart.to_string()),
            Err(e) => self.failed.push(ChartFailure {
                chart: chart.to_string(),
                message: e.to_string(),
            }),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Surface with every chart container at the configured chart size and the
/// map container at the configured map size.
pub fn dashboard_surface(config: &DashboardConfig) -> Surface {
    let mut surface = Surface::with_containers(
        chart_ids::CHARTS,
        config.render.chart_width,
        config.render.chart_height,
    );
    surface.add_container(chart_ids::MAP, config.map.width, config.map.height);
    surface
}

fn single_series(name: &str, counts: &[LabelCount]) -> (Vec<String>, Vec<LineSeries>) {
    let labels = counts.iter().map(|c| c.label.clone()).collect();
    let series = vec![LineSeries {
        name: name.to_string(),
        values: counts.iter().map(|c| c.value as f64).collect(),
    }];
    (labels, series)
}

/// Draw one chart from the bundle.
fn draw_chart(
    surface: &mut Surface,
    id: &str,
    bundle: &AggregateBundle,
    style: &ChartStyle,
    dimension: Option<Dimension>,
) -> Result<RenderOutcome, RenderError> {
    use self::chart_ids::*;

    match id {
        SHAPES => render_hbar(
            surface,
            id,
            &Datum::from_counts(&bundle.top_shapes),
            style,
            Some(&AxisTitles::new("Sightings", "Shape")),
            dimension,
        ),
        SHAPE_DONUT => render_donut(
            surface,
            id,
            &Datum::from_counts(&bundle.top_shapes),
            style,
            None,
            dimension,
        ),
        COUNTRIES => render_hbar(
            surface,
            id,
            &Datum::from_counts(&bundle.top_countries),
            style,
            Some(&AxisTitles::new("Sightings", "Country")),
            dimension,
        ),
        STATES => render_hbar(
            surface,
            id,
            &Datum::from_counts(&bundle.top_states),
            style,
            Some(&AxisTitles::new("Sightings", "State")),
            dimension,
        ),
        CITIES => render_hbar(
            surface,
            id,
            &Datum::from_counts(&bundle.top_cities),
            style,
            Some(&AxisTitles::new("Sightings", "City")),
            dimension,
        ),
        YEARS => {
            let (labels, series) = single_series("Sightings", &bundle.by_year);
            render_line(
                surface,
                id,
                &labels,
                &series,
                style,
                Some(&AxisTitles::new("Year", "Sightings")),
            )
        }
        CUMULATIVE => {
            let (labels, series) = single_series("Cumulative", &bundle.cumulative_by_year);
            render_line(
                surface,
                id,
                &labels,
                &series,
                style,
                Some(&AxisTitles::new("Year", "Total sightings")),
            )
        }
        MONTHS => render_bar(
            surface,
            id,
            &Datum::from_counts(&bundle.by_month),
            style,
            Some(&AxisTitles::new("Month", "Sightings")),
            dimension,
        ),
        WEEKDAYS => render_bar(
            surface,
            id,
            &Datum::from_counts(&bundle.by_weekday),
            style,
            Some(&AxisTitles::new("Weekday", "Sightings")),
            dimension,
        ),
        HOURS => render_radial(
            surface,
            id,
            &Datum::from_counts(&bundle.by_hour),
            style,
            Some(&AxisTitles::new("Hour of day", "Sightings")),
        ),
        DECADES => render_bar(
            surface,
            id,
            &Datum::from_counts(&bundle.by_decade),
            style,
            Some(&AxisTitles::new("Decade", "Sightings")),
            dimension,
        ),
        DELAYS => render_bar(
            surface,
            id,
            &Datum::from_counts(&bundle.delay_buckets),
            style,
            Some(&AxisTitles::new("Days until reported", "Sightings")),
            dimension,
        ),
        DELAY_BY_COUNTRY => render_hbar(
            surface,
            id,
            &Datum::from_averages(&bundle.avg_delay_by_country),
            style,
            Some(&AxisTitles::new("Average delay (days)", "Country")),
            dimension,
        ),
        DELAY_BY_YEAR => {
            let labels: Vec<String> = bundle
                .avg_delay_by_year
                .iter()
                .map(|a| a.label.clone())
                .collect();
            let series = vec![LineSeries {
                name: "Average delay".to_string(),
                values: bundle.avg_delay_by_year.iter().map(|a| a.average).collect(),
            }];
            render_line(
                surface,
                id,
                &labels,
                &series,
                style,
                Some(&AxisTitles::new("Year", "Average delay (days)")),
            )
        }
        MONTH_HOUR => render_heatmap(
            surface,
            id,
            &bundle.month_hour,
            style,
            Some(&AxisTitles::new("Hour", "Month")),
        ),
        SHAPE_DECADE => render_stacked(
            surface,
            id,
            &bundle.shape_by_decade,
            style,
            Some(&AxisTitles::new("Decade", "Sightings")),
        ),
        HEMISPHERES => render_donut(
            surface,
            id,
            &Datum::from_counts(&bundle.hemispheres.to_series()),
            style,
            None,
            dimension,
        ),
        COORDINATE_QUALITY => render_donut(
            surface,
            id,
            &Datum::from_counts(&bundle.coordinate_quality.to_series()),
            style,
            None,
            dimension,
        ),
        IMAGES => render_donut(
            surface,
            id,
            &Datum::from_counts(&bundle.image_split),
            style,
            None,
            dimension,
        ),
        SCATTER => render_scatter(
            surface,
            id,
            &bundle.scatter_sample,
            style,
            Some(&AxisTitles::new("Longitude", "Latitude")),
        ),
        _ => Ok(RenderOutcome::Skipped),
    }
}

/// The dashboard and all of its state.
pub struct Dashboard<B: MapBackend> {
    records: Vec<Record>,
    settings: AnalyticsSettings,
    style: ChartStyle,
    filter: FilterState,
    bundle: AggregateBundle,
    surface: Surface,
    map: MapRenderer<B>,
    cross_filter: CrossFilterTable,
    passes: u64,
}

impl<B: MapBackend> Dashboard<B> {
    /// Build a dashboard. Nothing is drawn until the first [`refresh`](Self::refresh).
    pub fn new(
        records: Vec<Record>,
        config: &DashboardConfig,
        surface: Surface,
        backend: B,
    ) -> Self {
        Self {
            records,
            settings: config.analytics.clone(),
            style: ChartStyle::from_settings(&config.render),
            filter: FilterState::new(),
            bundle: AggregateBundle::default(),
            surface,
            map: MapRenderer::new(backend, config.map.clone()),
            cross_filter: CrossFilterTable::default(),
            passes: 0,
        }
    }

    /// Run one full pass over the current filter.
    pub fn refresh(&mut self) -> PassReport {
        self.passes += 1;
        self.bundle = aggregate(&self.records, &self.filter, &self.settings);
        self.surface.hide_tooltip();

        let mut report = PassReport {
            pass: self.passes,
            filtered_records: self.bundle.filtered_records,
            ..PassReport::default()
        };

        for id in chart_ids::CHARTS {
            let dimension = self.cross_filter.dimension_for(id);
            let result = draw_chart(&mut self.surface, id, &self.bundle, &self.style, dimension);
            if let Err(e) = &result {
                log::warn!("Chart '{}' failed: {}", id, e);
                self.surface.show_error(id, &e.to_string());
            }
            report.record(id, result);
        }

        let result = self.render_map();
        report.record(chart_ids::MAP, result);

        log::debug!(
            "Pass {}: {} rendered, {} skipped, {} failed",
            report.pass,
            report.rendered.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    fn render_map(&mut self) -> Result<RenderOutcome, RenderError> {
        let result = self.map.render(
            &self.surface,
            chart_ids::MAP,
            &self.bundle.scatter_sample,
            &self.records,
        );
        if let Err(e) = &result {
            log::warn!("Map failed: {}", e);
        }
        result
    }

    /// Apply an explicit filter change and run a pass.
    pub fn apply_filter(&mut self, update: FilterUpdate) -> PassReport {
        self.filter.apply(update);
        self.refresh()
    }

    /// Cross-filter click on `category` in `chart_id`.
    ///
    /// Returns `None` without touching the filter when the chart does not
    /// filter anything.
    pub fn click(&mut self, chart_id: &str, category: &str) -> Option<PassReport> {
        let dimension = self.cross_filter.dimension_for(chart_id)?;
        let outcome = self.filter.toggle(dimension, category);
        log::info!("Cross-filter on '{}': {:?}", chart_id, outcome);
        Some(self.refresh())
    }

    /// Click on a drawn mark, resolved through its interaction.
    pub fn click_mark(&mut self, chart_id: &str, mark_index: usize) -> Option<PassReport> {
        let (dimension, category) = self.surface.click(chart_id, mark_index)?;
        self.filter.toggle(dimension, &category);
        Some(self.refresh())
    }

    /// Toggle clustered markers and redraw the map.
    pub fn toggle_map_markers(&mut self) -> MapMode {
        let mode = self.map.toggle_markers();
        // Failures are already logged and shown on the map indicator.
        let _ = self.render_map();
        mode
    }

    /// Toggle the heat overlay and redraw the map.
    pub fn toggle_map_heat(&mut self) -> MapMode {
        let mode = self.map.toggle_heat();
        let _ = self.render_map();
        mode
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn bundle(&self) -> &AggregateBundle {
        &self.bundle
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn map_mode(&self) -> MapMode {
        self.map.mode()
    }

    pub fn map_backend(&self) -> &B {
        self.map.backend()
    }

    pub fn cross_filter(&self) -> &CrossFilterTable {
        &self.cross_filter
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod dashboard_tests;
