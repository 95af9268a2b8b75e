//! Bar charts: vertical (ordered categories) and horizontal (Top-N lists).
//!
//! Bars scale against the largest value. When that maximum is 0 every bar is
//! drawn at 0 % width instead of dividing by zero.

use crate::error::RenderError;
use crate::services::filter::Dimension;

use super::chart::{
    draw_axis_titles, draw_no_data, format_value, outcome, percent_of, visible_label_indices,
    AxisTitles, ChartStyle, Datum, PlotArea, RenderOutcome,
};
use super::surface::{Anchor, HoverInfo, Mark, Shape, Surface};

fn bar_fraction(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn hover(datum: &Datum, total: f64) -> HoverInfo {
    HoverInfo {
        label: datum.label.clone(),
        value: datum.value,
        percent: Some(percent_of(datum.value, total)),
    }
}

/// Vertical bars over ordered categories (months, hours, decades, bins).
pub fn render_bar(
    surface: &mut Surface,
    container_id: &str,
    data: &[Datum],
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
    cross_filter: Option<Dimension>,
) -> Result<RenderOutcome, RenderError> {
    let container = match surface.prepare(container_id)? {
        Some(container) => container,
        None => return Ok(RenderOutcome::Skipped),
    };
    if data.is_empty() {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let area = PlotArea::new(container, 40.0, 12.0, 16.0, 36.0);
    let max = data.iter().map(|d| d.value).fold(0.0_f64, f64::max);
    let total: f64 = data.iter().map(|d| d.value).sum();
    let band = area.width / data.len() as f64;

    container.push(
        Mark::new(
            Shape::Line {
                x1: area.left,
                y1: area.bottom(),
                x2: area.right(),
                y2: area.bottom(),
            },
            "axis",
        )
        .stroke("#9ca3af"),
    );

    for (i, datum) in data.iter().enumerate() {
        let height = bar_fraction(datum.value, max) * area.height;
        container.push(
            Mark::new(
                Shape::Rect {
                    x: area.left + i as f64 * band + band * 0.1,
                    y: area.bottom() - height,
                    width: band * 0.8,
                    height,
                },
                "bar",
            )
            .fill(style.palette.color(i))
            .hover(hover(datum, total))
            .filter_on(cross_filter, &datum.label),
        );
    }

    for i in visible_label_indices(data.len(), style.label_threshold) {
        container.push(Mark::text(
            area.left + (i as f64 + 0.5) * band,
            area.bottom() + 14.0,
            data[i].label.as_str(),
            Anchor::Middle,
            "tick",
        ));
    }

    container.push(Mark::text(
        area.left - 4.0,
        area.top + 4.0,
        format_value(max),
        Anchor::End,
        "tick",
    ));
    draw_axis_titles(container, &area, axes);

    Ok(outcome(container))
}

/// Horizontal bars, one row per category, largest first as given.
pub fn render_hbar(
    surface: &mut Surface,
    container_id: &str,
    data: &[Datum],
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
    cross_filter: Option<Dimension>,
) -> Result<RenderOutcome, RenderError> {
    let container = match surface.prepare(container_id)? {
        Some(container) => container,
        None => return Ok(RenderOutcome::Skipped),
    };
    if data.is_empty() {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let area = PlotArea::new(container, 120.0, 48.0, 12.0, 24.0);
    let max = data.iter().map(|d| d.value).fold(0.0_f64, f64::max);
    let total: f64 = data.iter().map(|d| d.value).sum();
    let band = area.height / data.len() as f64;

    for (i, datum) in data.iter().enumerate() {
        let y = area.top + i as f64 * band;
        let width = bar_fraction(datum.value, max) * area.width;

        container.push(Mark::text(
            area.left - 6.0,
            y + band * 0.65,
            datum.label.as_str(),
            Anchor::End,
            "label",
        ));
        container.push(
            Mark::new(
                Shape::Rect {
                    x: area.left,
                    y: y + band * 0.15,
                    width,
                    height: band * 0.7,
                },
                "bar",
            )
            .fill(style.palette.color(i))
            .hover(hover(datum, total))
            .filter_on(cross_filter, &datum.label),
        );
        container.push(Mark::text(
            area.left + width + 4.0,
            y + band * 0.65,
            format_value(datum.value),
            Anchor::Start,
            "value",
        ));
    }
    draw_axis_titles(container, &area, axes);

    Ok(outcome(container))
}
