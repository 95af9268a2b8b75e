//! Latitude/longitude scatter on an equirectangular frame.

use crate::error::RenderError;
use crate::services::aggregate::SamplePoint;

use super::chart::{
    draw_axis_titles, draw_no_data, outcome, AxisTitles, ChartStyle, PlotArea, RenderOutcome,
};
use super::surface::{HoverInfo, Mark, Shape, Surface};

/// Screen position of a point inside `area`.
pub fn project(area: &PlotArea, latitude: f64, longitude: f64) -> (f64, f64) {
    (
        area.left + (longitude + 180.0) / 360.0 * area.width,
        area.top + (90.0 - latitude) / 180.0 * area.height,
    )
}

pub fn render_scatter(
    surface: &mut Surface,
    container_id: &str,
    points: &[SamplePoint],
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
) -> Result<RenderOutcome, RenderError> {
    let container = match surface.prepare(container_id)? {
        Some(container) => container,
        None => return Ok(RenderOutcome::Skipped),
    };
    if points.is_empty() {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let area = PlotArea::new(container, 24.0, 8.0, 8.0, 24.0);
    let (meridian, equator) = project(&area, 0.0, 0.0);

    container.push(
        Mark::new(
            Shape::Rect {
                x: area.left,
                y: area.top,
                width: area.width,
                height: area.height,
            },
            "frame",
        )
        .fill("none")
        .stroke("#d1d5db"),
    );
    container.push(
        Mark::new(
            Shape::Line {
                x1: area.left,
                y1: equator,
                x2: area.right(),
                y2: equator,
            },
            "grid",
        )
        .stroke("#e5e7eb"),
    );
    container.push(
        Mark::new(
            Shape::Line {
                x1: meridian,
                y1: area.top,
                x2: meridian,
                y2: area.bottom(),
            },
            "grid",
        )
        .stroke("#e5e7eb"),
    );

    let color = style.palette.color(0);
    for point in points {
        let (cx, cy) = project(&area, point.latitude, point.longitude);
        container.push(
            Mark::new(Shape::Circle { cx, cy, r: 2.5 }, "point")
                .fill(color)
                .opacity(0.6)
                .hover(HoverInfo {
                    label: format!("{:.2}, {:.2}", point.latitude, point.longitude),
                    value: point.record_index as f64,
                    percent: None,
                }),
        );
    }
    draw_axis_titles(container, &area, axes);

    Ok(outcome(container))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_corners() {
        let area = PlotArea {
            left: 0.0,
            top: 0.0,
            width: 360.0,
            height: 180.0,
        };
        assert_eq!(project(&area, 90.0, -180.0), (0.0, 0.0));
        assert_eq!(project(&area, -90.0, 180.0), (360.0, 180.0));
        assert_eq!(project(&area, 0.0, 0.0), (180.0, 90.0));
    }

    #[test]
    fn test_one_circle_per_point() {
        let mut surface = Surface::with_containers(["scatter"], 400.0, 220.0);
        let points = vec![
            SamplePoint {
                latitude: 33.4,
                longitude: -112.0,
                record_index: 0,
            },
            SamplePoint {
                latitude: -33.8,
                longitude: 151.2,
                record_index: 3,
            },
        ];
        render_scatter(&mut surface, "scatter", &points, &ChartStyle::default(), None).unwrap();
        let count = surface
            .container("scatter")
            .unwrap()
            .marks
            .iter()
            .filter(|m| m.class == "point")
            .count();
        assert_eq!(count, 2);
    }
}
