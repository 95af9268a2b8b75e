//! Chart and map rendering.
//!
//! Charts draw marks into the in-memory [`Surface`]; containers serialize to
//! SVG. The map goes through a [`MapBackend`].

pub mod bar;
pub mod chart;
pub mod donut;
pub mod heatmap;
pub mod line;
pub mod map;
pub mod map_commands;
pub mod page;
pub mod radial;
pub mod scatter;
pub mod stacked;
pub mod surface;
pub mod svg;

pub use bar::{render_bar, render_hbar};
pub use chart::{
    format_value, visible_label_indices, AxisTitles, ChartStyle, Datum, LineSeries, Palette,
    RenderOutcome,
};
pub use donut::render_donut;
pub use heatmap::render_heatmap;
pub use line::render_line;
pub use map::{ClusterIconSize, ClusterIcons, Indicator, MapBackend, MapMode, MapRenderer};
pub use map_commands::{CommandMapBackend, MapCommand};
pub use page::{render_page, Page};
pub use radial::render_radial;
pub use scatter::render_scatter;
pub use stacked::render_stacked;
pub use surface::{Container, HoverInfo, Mark, Shape, Surface, Tooltip};
