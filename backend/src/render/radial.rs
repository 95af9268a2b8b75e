//! Radial 24-hour clock: one wedge per hour, length proportional to count.

use std::f64::consts::PI;

use crate::error::RenderError;

use super::chart::{
    draw_no_data, outcome, percent_of, scale_max, visible_label_indices, AxisTitles, ChartStyle,
    Datum, RenderOutcome,
};
use super::surface::{Anchor, HoverInfo, Mark, Shape, Surface};

/// Wedges start at 12 o'clock (hour 0) and run clockwise.
pub fn render_radial(
    surface: &mut Surface,
    container_id: &str,
    data: &[Datum],
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
) -> Result<RenderOutcome, RenderError> {
    let container = match surface.prepare(container_id)? {
        Some(container) => container,
        None => return Ok(RenderOutcome::Skipped),
    };
    if data.is_empty() {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let cx = container.width / 2.0;
    let cy = container.height / 2.0;
    let radius = (cx.min(cy) - 18.0).max(2.0);
    let hub = radius * 0.2;
    let max = scale_max(data.iter().map(|d| d.value));
    let total: f64 = data.iter().map(|d| d.value).sum();
    let slot = 2.0 * PI / data.len() as f64;

    container.push(
        Mark::new(Shape::Circle { cx, cy, r: radius }, "frame")
            .fill("none")
            .stroke("#e5e7eb"),
    );

    for (i, datum) in data.iter().enumerate() {
        let length = (datum.value.max(0.0) / max).min(1.0) * (radius - hub);
        let start = i as f64 * slot;
        container.push(
            Mark::new(
                Shape::Arc {
                    cx,
                    cy,
                    inner: hub,
                    outer: hub + length,
                    start: start + slot * 0.05,
                    end: start + slot * 0.95,
                },
                "wedge",
            )
            .fill(style.palette.color(0))
            .hover(HoverInfo {
                label: datum.label.clone(),
                value: datum.value,
                percent: Some(percent_of(datum.value, total)),
            }),
        );
    }

    for i in visible_label_indices(data.len(), style.label_threshold) {
        let angle = (i as f64 + 0.5) * slot;
        container.push(Mark::text(
            cx + (radius + 10.0) * angle.sin(),
            cy - (radius + 10.0) * angle.cos() + 4.0,
            data[i].label.as_str(),
            Anchor::Middle,
            "tick",
        ));
    }

    if let Some(title) = axes.and_then(|a| a.x.as_deref()) {
        container.push(Mark::text(cx, container.height - 2.0, title, Anchor::Middle, "axis-title"));
    }

    Ok(outcome(container))
}
