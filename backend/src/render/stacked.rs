//! Stacked bars: one column per matrix column, one stacked segment per row.

use crate::error::RenderError;
use crate::services::aggregate::Matrix;

use super::chart::{
    draw_axis_titles, draw_no_data, outcome, percent_of, scale_max, visible_label_indices,
    AxisTitles, ChartStyle, PlotArea, RenderOutcome,
};
use super::surface::{Anchor, HoverInfo, Mark, Shape, Surface};

/// Columns scale against the tallest stack (fallback 1). Rows take palette
/// colours in order and get a legend entry.
pub fn render_stacked(
    surface: &mut Surface,
    container_id: &str,
    matrix: &Matrix,
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
) -> Result<RenderOutcome, RenderError> {
    if matrix.cells.len() != matrix.row_labels.len() {
        return Err(RenderError::InvalidData {
            container: container_id.to_string(),
            message: "matrix rows do not match its labels".to_string(),
        });
    }

    let container = match surface.prepare(container_id)? {
        Some(container) => container,
        None => return Ok(RenderOutcome::Skipped),
    };
    if matrix.is_empty() {
        draw_no_data(container);
        return Ok(outcome(container));
    }

    let columns = matrix.column_labels.len();
    let column_totals: Vec<f64> = (0..columns)
        .map(|c| (0..matrix.row_labels.len()).map(|r| matrix.get(r, c) as f64).sum())
        .collect();
    let max = scale_max(column_totals.iter().copied());

    let area = PlotArea::new(container, 40.0, 110.0, 16.0, 36.0);
    let band = area.width / columns as f64;

    for (c, column_label) in matrix.column_labels.iter().enumerate() {
        let mut y = area.bottom();
        for (r, row_label) in matrix.row_labels.iter().enumerate() {
            let value = matrix.get(r, c) as f64;
            if value <= 0.0 {
                continue;
            }
            let height = value / max * area.height;
            y -= height;
            container.push(
                Mark::new(
                    Shape::Rect {
                        x: area.left + c as f64 * band + band * 0.1,
                        y,
                        width: band * 0.8,
                        height,
                    },
                    "segment",
                )
                .fill(style.palette.color(r))
                .hover(HoverInfo {
                    label: format!("{}, {}", row_label, column_label),
                    value,
                    percent: Some(percent_of(value, column_totals[c])),
                }),
            );
        }
    }

    for c in visible_label_indices(columns, style.label_threshold) {
        container.push(Mark::text(
            area.left + (c as f64 + 0.5) * band,
            area.bottom() + 14.0,
            matrix.column_labels[c].as_str(),
            Anchor::Middle,
            "tick",
        ));
    }

    for (r, row_label) in matrix.row_labels.iter().enumerate() {
        container.push(
            Mark::text(
                area.right() + 8.0,
                area.top + 14.0 * r as f64 + 8.0,
                row_label.as_str(),
                Anchor::Start,
                "legend",
            )
            .fill(style.palette.color(r)),
        );
    }
    draw_axis_titles(container, &area, axes);

    Ok(outcome(container))
}
