mod support;

use sightings_analytics::config::DashboardConfig;
use sightings_analytics::error::RenderError;
use sightings_analytics::parsing::parse_records;
use sightings_analytics::render::{
    render_bar, render_donut, render_hbar, render_line, ChartStyle, CommandMapBackend, Datum,
    LineSeries, RenderOutcome, Shape, Surface,
};
use sightings_analytics::services::dashboard::dashboard_surface;
use sightings_analytics::services::{chart_ids, Dashboard};

use support::sample_csv;

fn data(values: &[(&str, f64)]) -> Vec<Datum> {
    values.iter().map(|(l, v)| Datum::new(*l, *v)).collect()
}

fn sample_dashboard() -> Dashboard<CommandMapBackend> {
    let config = DashboardConfig::default();
    let records = parse_records(&sample_csv(), &config.columns, &config.analytics);
    Dashboard::new(
        records,
        &config,
        dashboard_surface(&config),
        CommandMapBackend::new(),
    )
}

fn svgs(dash: &Dashboard<CommandMapBackend>) -> Vec<String> {
    chart_ids::CHARTS
        .iter()
        .map(|id| dash.surface().to_svg(id).unwrap_or_default())
        .collect()
}

#[test]
fn test_second_pass_draws_identical_charts() {
    let mut dash = sample_dashboard();
    dash.refresh();
    let first = svgs(&dash);
    let live_after_first = dash.map_backend().live_layers().len();

    dash.refresh();
    assert_eq!(svgs(&dash), first);
    assert_eq!(dash.map_backend().live_layers().len(), live_after_first);
    assert_eq!(dash.map_backend().maps_created(), 1);
}

#[test]
fn test_all_zero_bars_have_zero_extent() {
    let mut surface = Surface::with_containers(["v", "h"], 400.0, 200.0);
    let zeros = data(&[("a", 0.0), ("b", 0.0), ("c", 0.0)]);
    let style = ChartStyle::default();
    render_bar(&mut surface, "v", &zeros, &style, None, None).unwrap();
    render_hbar(&mut surface, "h", &zeros, &style, None, None).unwrap();

    for (id, extent) in [("v", "height"), ("h", "width")] {
        let bars: Vec<f64> = surface
            .container(id)
            .unwrap()
            .marks
            .iter()
            .filter(|m| m.class == "bar")
            .filter_map(|m| match m.shape {
                Shape::Rect { width, height, .. } => {
                    Some(if extent == "width" { width } else { height })
                }
                _ => None,
            })
            .collect();
        assert_eq!(bars, vec![0.0, 0.0, 0.0], "{}", id);
    }
}

#[test]
fn test_missing_container_is_skipped_silently() {
    let mut surface = Surface::new();
    let style = ChartStyle::default();
    let d = data(&[("a", 1.0)]);
    assert_eq!(
        render_hbar(&mut surface, "absent", &d, &style, None, None),
        Ok(RenderOutcome::Skipped)
    );
    assert_eq!(
        render_donut(&mut surface, "absent", &d, &style, None, None),
        Ok(RenderOutcome::Skipped)
    );
    assert_eq!(surface.ids().count(), 0);
}

#[test]
fn test_dense_axis_keeps_last_label() {
    let mut surface = Surface::with_containers(["years"], 800.0, 300.0);
    let years: Vec<Datum> = (1990..2020)
        .map(|y| Datum::new(y.to_string(), 1.0))
        .collect();
    render_bar(&mut surface, "years", &years, &ChartStyle::default(), None, None).unwrap();

    let ticks: Vec<String> = surface
        .container("years")
        .unwrap()
        .marks
        .iter()
        .filter(|m| m.class == "tick")
        .filter_map(|m| match &m.shape {
            Shape::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect();
    assert!(ticks.contains(&"1990".to_string()));
    assert!(ticks.contains(&"2019".to_string()));
    assert!(!ticks.contains(&"1991".to_string()));
}

#[test]
fn test_line_rejects_misaligned_series() {
    let mut surface = Surface::with_containers(["trend"], 400.0, 200.0);
    let labels = vec!["1990".to_string(), "1991".to_string()];
    let series = vec![LineSeries {
        name: "count".to_string(),
        values: vec![1.0],
    }];
    let err = render_line(
        &mut surface,
        "trend",
        &labels,
        &series,
        &ChartStyle::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::InvalidData { .. }));
}

#[test]
fn test_zero_area_container_is_an_error() {
    let mut surface = Surface::new();
    surface.add_container("flat", 0.0, 200.0);
    let err = render_bar(
        &mut surface,
        "flat",
        &data(&[("a", 1.0)]),
        &ChartStyle::default(),
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err, RenderError::ZeroArea("flat".to_string()));
}
