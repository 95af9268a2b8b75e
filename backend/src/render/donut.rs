//! Donut charts.

use std::f64::consts::PI;

use crate::error::RenderError;
use crate::services::filter::Dimension;

use super::chart::{
    draw_no_data, outcome, percent_of, AxisTitles, ChartStyle, Datum, RenderOutcome,
};
use super::surface::{Anchor, HoverInfo, Mark, Shape, Surface};

/// Segments sweep clockwise from 12 o'clock in data order. Zero-valued
/// categories still get a legend entry but no segment.
pub fn render_donut(
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

    let total: f64 = data.iter().map(|d| d.value.max(0.0)).sum();
    if total <= 0.0 {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let legend_width = 140.0_f64.min(container.width / 2.0);
    let cx = (container.width - legend_width) / 2.0;
    let cy = container.height / 2.0;
    let outer = (cx.min(cy) - 8.0).max(1.0);
    let inner = outer * 0.55;

    let mut angle = 0.0;
    for (i, datum) in data.iter().enumerate() {
        let value = datum.value.max(0.0);
        let percent = percent_of(value, total);
        if value > 0.0 {
            let sweep = value / total * 2.0 * PI;
            container.push(
                Mark::new(
                    Shape::Arc {
                        cx,
                        cy,
                        inner,
                        outer,
                        start: angle,
                        end: angle + sweep,
                    },
                    "segment",
                )
                .fill(style.palette.color(i))
                .hover(HoverInfo {
                    label: datum.label.clone(),
                    value: datum.value,
                    percent: Some(percent),
                })
                .filter_on(cross_filter, &datum.label),
            );
            angle += sweep;
        }

        container.push(
            Mark::text(
                container.width - legend_width + 8.0,
                16.0 + 14.0 * i as f64,
                format!("{} ({:.1}%)", datum.label, percent),
                Anchor::Start,
                "legend",
            )
            .fill(style.palette.color(i)),
        );
    }

    if let Some(title) = axes.and_then(|a| a.x.as_deref()) {
        container.push(Mark::text(cx, cy + 4.0, title, Anchor::Middle, "axis-title"));
    }

    Ok(outcome(container))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_cover_full_circle() {
        let mut surface = Surface::with_containers(["d"], 400.0, 200.0);
        let data = vec![
            Datum::new("With image", 1.0),
            Datum::new("Without image", 3.0),
        ];
        render_donut(&mut surface, "d", &data, &ChartStyle::default(), None, None).unwrap();
        let arcs: Vec<(f64, f64)> = surface
            .container("d")
            .unwrap()
            .marks
            .iter()
            .filter_map(|m| match m.shape {
                Shape::Arc { start, end, .. } => Some((start, end)),
                _ => None,
            })
            .collect();
        assert_eq!(arcs.len(), 2);
        assert!((arcs[0].1 - PI / 2.0).abs() < 1e-9);
        assert!((arcs[1].1 - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_shows_no_data() {
        let mut surface = Surface::with_containers(["d"], 400.0, 200.0);
        let data = vec![Datum::new("a", 0.0), Datum::new("b", 0.0)];
        render_donut(&mut surface, "d", &data, &ChartStyle::default(), None, None).unwrap();
        let marks = &surface.container("d").unwrap().marks;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].class, "empty");
    }

    #[test]
    fn test_shape_donut_segments_filter() {
        let mut surface = Surface::with_containers(["shape-donut"], 400.0, 200.0);
        let data = vec![Datum::new("Disk", 2.0), Datum::new("Orb", 2.0)];
        render_donut(
            &mut surface,
            "shape-donut",
            &data,
            &ChartStyle::default(),
            None,
            Some(Dimension::Shape),
        )
        .unwrap();
        let info = surface.hover("shape-donut", 0).unwrap();
        assert_eq!(info.percent, Some(50.0));
        assert_eq!(
            surface.click("shape-donut", 0),
            Some((Dimension::Shape, "Disk".to_string()))
        );
    }
}
