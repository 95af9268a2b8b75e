//! Matrix heatmap (month x hour).

use crate::error::RenderError;
use crate::services::aggregate::Matrix;

use super::chart::{
    draw_axis_titles, draw_no_data, outcome, percent_of, scale_max, visible_label_indices,
    AxisTitles, ChartStyle, PlotArea, RenderOutcome,
};
use super::surface::{Anchor, HoverInfo, Mark, Shape, Surface};

/// Cell opacity is `value / max`, with the max falling back to 1.
pub fn render_heatmap(
    surface: &mut Surface,
    container_id: &str,
    matrix: &Matrix,
    style: &ChartStyle,
    axes: Option<&AxisTitles>,
) -> Result<RenderOutcome, RenderError> {
    if matrix.cells.len() != matrix.row_labels.len()
        || matrix
            .cells
            .iter()
            .any(|row| row.len() != matrix.column_labels.len())
    {
        return Err(RenderError::InvalidData {
            container: container_id.to_string(),
            message: "matrix cells do not match its labels".to_string(),
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

    let area = PlotArea::new(container, 40.0, 8.0, 8.0, 36.0);
    let max = scale_max(matrix.cells.iter().flatten().map(|v| *v as f64));
    let total = matrix.total() as f64;
    let cell_w = area.width / matrix.column_labels.len() as f64;
    let cell_h = area.height / matrix.row_labels.len() as f64;
    let color = style.palette.color(0);

    for (r, row_label) in matrix.row_labels.iter().enumerate() {
        for (c, column_label) in matrix.column_labels.iter().enumerate() {
            let value = matrix.get(r, c) as f64;
            container.push(
                Mark::new(
                    Shape::Rect {
                        x: area.left + c as f64 * cell_w,
                        y: area.top + r as f64 * cell_h,
                        width: cell_w,
                        height: cell_h,
                    },
                    "cell",
                )
                .fill(color)
                .opacity(value / max)
                .hover(HoverInfo {
                    label: format!("{} {}", row_label, column_label),
                    value,
                    percent: Some(percent_of(value, total)),
                }),
            );
        }
        container.push(Mark::text(
            area.left - 4.0,
            area.top + (r as f64 + 0.7) * cell_h,
            row_label.as_str(),
            Anchor::End,
            "label",
        ));
    }

    for c in visible_label_indices(matrix.column_labels.len(), style.label_threshold) {
        container.push(Mark::text(
            area.left + (c as f64 + 0.5) * cell_w,
            area.bottom() + 14.0,
            matrix.column_labels[c].as_str(),
            Anchor::Middle,
            "tick",
        ));
    }
    draw_axis_titles(container, &area, axes);

    Ok(outcome(container))
}
