//! Types shared by every chart renderer.

use serde::{Deserialize, Serialize};

use crate::config::RenderSettings;
use crate::services::aggregate::{LabelAverage, LabelCount};

use super::surface::{Anchor, Container, Mark};

/// One category and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub label: String,
    pub value: f64,
}

impl Datum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn from_counts(counts: &[LabelCount]) -> Vec<Datum> {
        counts
            .iter()
            .map(|c| Datum::new(c.label.clone(), c.value as f64))
            .collect()
    }

    pub fn from_averages(averages: &[LabelAverage]) -> Vec<Datum> {
        averages
            .iter()
            .map(|a| Datum::new(a.label.clone(), a.average))
            .collect()
    }
}

/// One line of a line chart, aligned with the chart's labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Optional axis titles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisTitles {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisTitles {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
        }
    }
}

/// Result of a successful renderer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderOutcome {
    /// Content was drawn; `marks` counts every mark in the container
    Rendered { marks: usize },
    /// The container is not on this surface
    Skipped,
}

/// Fixed colour cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    const FALLBACK: &'static str = "#1f77b4";

    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }

    /// Colour `i`, cycling by index modulo palette length.
    pub fn color(&self, i: usize) -> &str {
        if self.colors.is_empty() {
            Self::FALLBACK
        } else {
            &self.colors[i % self.colors.len()]
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Palette plus the label legibility threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub palette: Palette,
    pub label_threshold: usize,
}

impl ChartStyle {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            palette: Palette::new(settings.palette.clone()),
            label_threshold: settings.label_threshold,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}

/// Indices of the x-axis labels to draw for `len` categories.
///
/// Above `threshold` only every `ceil(len / threshold)`-th label is kept; the
/// last label is always included.
pub fn visible_label_indices(len: usize, threshold: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let step = if threshold == 0 || len <= threshold {
        1
    } else {
        len.div_ceil(threshold)
    };
    let mut indices: Vec<usize> = (0..len).step_by(step).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

/// Share of `total` as a percentage; 0 when the total is 0.
pub fn percent_of(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Scale maximum for line, radial and heatmap charts; 1 when nothing is positive.
pub fn scale_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Drawing region inside a container's margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(container: &Container, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: (container.width - left - right).max(1.0),
            height: (container.height - top - bottom).max(1.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Draw axis titles below and left of the plot area.
pub fn draw_axis_titles(container: &mut Container, area: &PlotArea, axes: Option<&AxisTitles>) {
    let axes = match axes {
        Some(axes) => axes,
        None => return,
    };
    if let Some(x) = &axes.x {
        container.push(Mark::text(
            area.left + area.width / 2.0,
            container.height - 4.0,
            x.as_str(),
            Anchor::Middle,
            "axis-title",
        ));
    }
    if let Some(y) = &axes.y {
        container.push(Mark::text(
            4.0,
            area.top - 4.0,
            y.as_str(),
            Anchor::Start,
            "axis-title",
        ));
    }
}

/// Centered placeholder for charts with nothing to show.
pub fn draw_no_data(container: &mut Container) {
    let (x, y) = (container.width / 2.0, container.height / 2.0);
    container.push(Mark::text(x, y, "No data", Anchor::Middle, "empty").fill("#6b7280"));
}

/// Value for display: integers without decimals, others to one place.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub(crate) fn outcome(container: &Container) -> RenderOutcome {
    RenderOutcome::Rendered {
        marks: container.marks.len(),
    }
}
