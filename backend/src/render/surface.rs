//! In-memory drawing surface: chart containers keyed by id plus the tooltip
//! shared by every chart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RenderError;
use crate::services::filter::Dimension;

/// Text anchoring, as in SVG `text-anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Geometry of one mark. Angles are radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
    },
    Arc {
        cx: f64,
        cy: f64,
        inner: f64,
        outer: f64,
        start: f64,
        end: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: Anchor,
    },
}

/// What the tooltip shows for a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    pub label: String,
    pub value: f64,
    /// Share of the chart total, 0..=100
    pub percent: Option<f64>,
}

impl HoverInfo {
    pub fn text(&self) -> String {
        let value = super::format_value(self.value);
        match self.percent {
            Some(p) => format!("{}: {} ({:.1}%)", self.label, value, p),
            None => format!("{}: {}", self.label, value),
        }
    }
}

/// Hover and click affordances of a mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub hover: HoverInfo,
    /// Cross-filter action fired on click
    pub filter: Option<(Dimension, String)>,
}

/// One drawn primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub shape: Shape,
    pub class: &'static str,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub opacity: Option<f64>,
    pub interaction: Option<Interaction>,
}

impl Mark {
    pub fn new(shape: Shape, class: &'static str) -> Self {
        Self {
            shape,
            class,
            fill: None,
            stroke: None,
            opacity: None,
            interaction: None,
        }
    }

    pub fn text(
        x: f64,
        y: f64,
        content: impl Into<String>,
        anchor: Anchor,
        class: &'static str,
    ) -> Self {
        Self::new(
            Shape::Text {
                x,
                y,
                content: content.into(),
                anchor,
            },
            class,
        )
    }

    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = Some(color.into());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn hover(mut self, hover: HoverInfo) -> Self {
        self.interaction = Some(Interaction { hover, filter: None });
        self
    }

    /// Attach a click-to-filter action; requires hover info to have been set.
    pub fn filter_on(mut self, dimension: Option<Dimension>, category: &str) -> Self {
        if let (Some(dimension), Some(interaction)) = (dimension, self.interaction.as_mut()) {
            interaction.filter = Some((dimension, category.to_string()));
        }
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interaction.is_some()
    }
}

/// One chart container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub marks: Vec<Mark>,
}

impl Container {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            marks: Vec::new(),
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    pub fn interactive_marks(&self) -> impl Iterator<Item = (usize, &Mark)> {
        self.marks.iter().enumerate().filter(|(_, m)| m.is_interactive())
    }

    pub fn to_svg(&self) -> String {
        super::svg::container_svg(self)
    }
}

/// Shared tooltip state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub content: String,
}

/// Every container on the page and the tooltip.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Surface {
    containers: BTreeMap<String, Container>,
    tooltip: Tooltip,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface with one container per id, all of the same size.
    pub fn with_containers<'a, I>(ids: I, width: f64, height: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut surface = Self::new();
        for id in ids {
            surface.add_container(id, width, height);
        }
        surface
    }

    pub fn add_container(&mut self, id: &str, width: f64, height: f64) {
        self.containers
            .insert(id.to_string(), Container::new(id, width, height));
    }

    pub fn remove_container(&mut self, id: &str) -> Option<Container> {
        self.containers.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    /// Clear a container for drawing.
    ///
    /// `Ok(None)` when the container does not exist; `ZeroArea` when it cannot
    /// be drawn into.
    pub fn prepare(&mut self, id: &str) -> Result<Option<&mut Container>, RenderError> {
        match self.containers.get_mut(id) {
            None => Ok(None),
            Some(container) if !container.has_area() => {
                container.clear();
                Err(RenderError::ZeroArea(id.to_string()))
            }
            Some(container) => {
                container.clear();
                Ok(Some(container))
            }
        }
    }

    /// Replace a container's content with an inline error message.
    pub fn show_error(&mut self, id: &str, message: &str) {
        if let Some(container) = self.containers.get_mut(id) {
            container.clear();
            let x = container.width.max(0.0) / 2.0;
            let y = container.height.max(0.0) / 2.0;
            container.push(Mark::text(x, y, message, Anchor::Middle, "error").fill("#b91c1c"));
        }
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn show_tooltip(&mut self, info: &HoverInfo, x: f64, y: f64) {
        self.tooltip = Tooltip {
            visible: true,
            x,
            y,
            content: info.text(),
        };
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip.visible = false;
    }

    /// Hover over a mark: shows the tooltip at the mark and returns its info.
    pub fn hover(&mut self, container: &str, mark_index: usize) -> Option<HoverInfo> {
        let mark = self.containers.get(container)?.marks.get(mark_index)?;
        let info = mark.interaction.as_ref()?.hover.clone();
        let (x, y) = anchor_point(&mark.shape);
        self.show_tooltip(&info, x, y);
        Some(info)
    }

    /// Click on a mark: the cross-filter action it carries, if any.
    pub fn click(&self, container: &str, mark_index: usize) -> Option<(Dimension, String)> {
        self.containers
            .get(container)?
            .marks
            .get(mark_index)?
            .interaction
            .as_ref()?
            .filter
            .clone()
    }

    pub fn to_svg(&self, id: &str) -> Option<String> {
        self.containers.get(id).map(Container::to_svg)
    }
}

/// Point a tooltip is positioned at for a given shape.
fn anchor_point(shape: &Shape) -> (f64, f64) {
    match shape {
        Shape::Rect { x, y, width, .. } => (x + width / 2.0, *y),
        Shape::Circle { cx, cy, .. } => (*cx, *cy),
        Shape::Line { x2, y2, .. } => (*x2, *y2),
        Shape::Polyline { points } => points.first().copied().unwrap_or((0.0, 0.0)),
        Shape::Arc {
            cx,
            cy,
            outer,
            start,
            end,
            ..
        } => {
            let mid = (start + end) / 2.0;
            (cx + outer * mid.sin(), cy - outer * mid.cos())
        }
        Shape::Text { x, y, .. } => (*x, *y),
    }
}
