//! Line charts: one or more series over shared x labels.

use crate::error::RenderError;

use super::chart::{
    draw_axis_titles, draw_no_data, format_value, outcome, scale_max, visible_label_indices,
    AxisTitles, ChartStyle, LineSeries, PlotArea, RenderOutcome,
};
use super::surface::{Anchor, HoverInfo, Mark, Shape, Surface};

pub fn render_line(
    surface: &mut Surface,
    container_id: &str,
    labels: &[String],
    series: &[LineSeries],
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
) -> Result<RenderOutcome, RenderError> {
    if let Some(bad) = series.iter().find(|s| s.values.len() != labels.len()) {
        return Err(RenderError::InvalidData {
            container: container_id.to_string(),
            message: format!(
                "series '{}' has {} values for {} labels",
                bad.name,
                bad.values.len(),
                labels.len()
            ),
        });
    }

    let container = match surface.prepare(container_id)? {
        Some(container) => container,
        None => return Ok(RenderOutcome::Skipped),
    };
    if labels.is_empty() || series.is_empty() {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let area = PlotArea::new(container, 48.0, 16.0, 20.0, 36.0);
    let max = scale_max(series.iter().flat_map(|s| s.values.iter().copied()));
    let n = labels.len();
    let x_at = |i: usize| {
        if n == 1 {
            area.left + area.width / 2.0
        } else {
            area.left + i as f64 * area.width / (n - 1) as f64
        }
    };
    let y_at = |v: f64| area.bottom() - (v.max(0.0) / max).min(1.0) * area.height;

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

    for (s, line) in series.iter().enumerate() {
        let color = style.palette.color(s);
        let points: Vec<(f64, f64)> = line
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (x_at(i), y_at(*v)))
            .collect();

        container.push(Mark::new(Shape::Polyline { points: points.clone() }, "line").stroke(color));

        for (i, (x, y)) in points.into_iter().enumerate() {
            let label = if series.len() > 1 {
                format!("{} {}", line.name, labels[i])
            } else {
                labels[i].clone()
            };
            container.push(
                Mark::new(Shape::Circle { cx: x, cy: y, r: 3.0 }, "point")
                    .fill(color)
                    .hover(HoverInfo {
                        label,
                        value: line.values[i],
                        percent: None,
                    }),
            );
        }
    }

    for i in visible_label_indices(n, style.label_threshold) {
        container.push(Mark::text(
            x_at(i),
            area.bottom() + 14.0,
            labels[i].as_str(),
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

    if series.len() > 1 {
        for (s, line) in series.iter().enumerate() {
            container.push(
                Mark::text(
                    area.right(),
                    area.top + 12.0 * s as f64,
                    line.name.as_str(),
                    Anchor::End,
                    "legend",
                )
                .fill(style.palette.color(s)),
            );
        }
    }
    draw_axis_titles(container, &area, axes);

    Ok(outcome(container))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| (1990 + i).to_string()).collect()
    }

    #[test]
    fn test_flat_zero_series_uses_fallback_scale() {
        let mut surface = Surface::with_containers(["years"], 400.0, 200.0);
        let series = vec![LineSeries {
            name: "count".to_string(),
            values: vec![0.0, 0.0, 0.0],
        }];
        render_line(&mut surface, "years", &labels(3), &series, &ChartStyle::default(), None)
            .unwrap();
        let container = surface.container("years").unwrap();
        for mark in container.marks.iter().filter(|m| m.class == "point") {
            match mark.shape {
                Shape::Circle { cy, .. } => assert!(cy.is_finite()),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_mismatched_series_is_invalid() {
        let mut surface = Surface::with_containers(["years"], 400.0, 200.0);
        let series = vec![LineSeries {
            name: "count".to_string(),
            values: vec![1.0],
        }];
        let style = ChartStyle::default();
        let err =
            render_line(&mut surface, "years", &labels(2), &series, &style, None).unwrap_err();
        assert!(matches!(err, RenderError::InvalidData { .. }));
    }

    #[test]
    fn test_single_point_is_centered() {
        let mut surface = Surface::with_containers(["years"], 400.0, 200.0);
        let series = vec![LineSeries {
            name: "count".to_string(),
            values: vec![5.0],
        }];
        render_line(&mut surface, "years", &labels(1), &series, &ChartStyle::default(), None)
            .unwrap();
        let point = surface
            .container("years")
            .unwrap()
            .marks
            .iter()
            .find(|m| m.class == "point")
            .unwrap();
        match point.shape {
            Shape::Circle { cx, .. } => assert_eq!(cx, 48.0 + (400.0 - 64.0) / 2.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_multiple_series_get_legend_and_colors() {
        let mut surface = Surface::with_containers(["c"], 400.0, 200.0);
        let series = vec![
            LineSeries {
                name: "Disk".to_string(),
                values: vec![1.0, 2.0],
            },
            LineSeries {
                name: "Orb".to_string(),
                values: vec![2.0, 1.0],
            },
        ];
        let style = ChartStyle::default();
        render_line(&mut surface, "c", &labels(2), &series, &style, None).unwrap();
        let container = surface.container("c").unwrap();
        let lines: Vec<_> = container.marks.iter().filter(|m| m.class == "line").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].stroke.as_deref(), Some(style.palette.color(1)));
        assert_eq!(container.marks.iter().filter(|m| m.class == "legend").count(), 2);
    }
}
