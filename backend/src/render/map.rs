//! Map rendering over an external mapping library.
//!
//! The library is reached only through [`MapBackend`]. [`MapRenderer`] owns
//! the map handle and the layers it added, so every pass starts from a clean
//! map without recreating it.

use serde::{Deserialize, Serialize};

use crate::config::MapSettings;
use crate::error::RenderError;
use crate::models::{GeoPoint, Record};
use crate::services::aggregate::SamplePoint;

use super::chart::RenderOutcome;
use super::surface::Surface;
use super::svg::escape;

/// Handle to a map created by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapHandle(pub u32);

/// Handle to a layer (tiles, marker, cluster group, heat overlay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u32);

/// Cluster icon size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterIconSize {
    Small,
    Medium,
    Large,
}

impl ClusterIconSize {
    pub fn css_class(&self) -> &'static str {
        match self {
            ClusterIconSize::Small => "marker-cluster-small",
            ClusterIconSize::Medium => "marker-cluster-medium",
            ClusterIconSize::Large => "marker-cluster-large",
        }
    }
}

/// Count thresholds for cluster icon sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIcons {
    /// Clusters with fewer members are small
    pub small_below: usize,
    /// Clusters with fewer members (and not small) are medium
    pub medium_below: usize,
}

impl ClusterIcons {
    pub fn size_for(&self, count: usize) -> ClusterIconSize {
        if count < self.small_below {
            ClusterIconSize::Small
        } else if count < self.medium_below {
            ClusterIconSize::Medium
        } else {
            ClusterIconSize::Large
        }
    }
}

impl Default for ClusterIcons {
    fn default() -> Self {
        Self {
            small_below: 10,
            medium_below: 100,
        }
    }
}

/// Visible status message over the map container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Indicator {
    NoData,
    Error(String),
}

impl Indicator {
    pub fn message(&self) -> &str {
        match self {
            Indicator::NoData => "No sightings with usable coordinates for this filter",
            Indicator::Error(message) => message,
        }
    }
}

/// Which overlays are drawn. Both, either or neither may be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapMode {
    pub markers: bool,
    pub heat: bool,
}

impl Default for MapMode {
    fn default() -> Self {
        Self {
            markers: true,
            heat: false,
        }
    }
}

/// Capabilities the dashboard needs from a mapping library.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so the dashboard can be shared by the
/// HTTP layer.
pub trait MapBackend: Send + Sync {
    /// Whether the library loaded and can draw.
    fn is_available(&self) -> bool;

    /// Create a map in the given container.
    fn create_map(&mut self, container_id: &str) -> Result<MapHandle, RenderError>;

    fn add_tile_layer(&mut self, map: MapHandle, url: &str, attribution: &str) -> LayerId;

    /// Add a standalone marker with popup HTML.
    fn add_marker(&mut self, map: MapHandle, point: GeoPoint, popup: &str) -> LayerId;

    /// Create an empty marker cluster group using the given icon thresholds.
    fn create_cluster_group(&mut self, map: MapHandle, icons: &ClusterIcons) -> LayerId;

    /// Add a marker to a cluster group. Removing the group removes its markers.
    fn add_to_cluster(&mut self, cluster: LayerId, point: GeoPoint, popup: &str) -> LayerId;

    /// Create a density overlay.
    fn create_heat_layer(
        &mut self,
        map: MapHandle,
        points: &[GeoPoint],
        radius: u32,
        blur: u32,
    ) -> LayerId;

    fn remove_layer(&mut self, map: MapHandle, layer: LayerId);

    /// Fit the viewport to `points` with `padding` pixels around them.
    fn fit_bounds(&mut self, map: MapHandle, points: &[GeoPoint], padding: u32);

    fn set_view(&mut self, map: MapHandle, center: GeoPoint, zoom: u8);

    fn show_indicator(&mut self, container_id: &str, indicator: &Indicator);

    fn clear_indicator(&mut self, container_id: &str);
}

/// Popup HTML for one sighting: shape, place, date, summary.
pub fn popup_html(record: &Record) -> String {
    let date = record
        .occurred
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown date".to_string());
    let mut html = format!(
        "<strong>{}</strong><br>{}<br>{}",
        escape(&record.shape),
        escape(&record.place()),
        date
    );
    if !record.summary.is_empty() {
        let summary: String = record.summary.chars().take(200).collect();
        html.push_str("<br>");
        html.push_str(&escape(&summary));
    }
    html
}

/// Stateful adapter drawing the coordinate sample through a [`MapBackend`].
#[derive(Debug)]
pub struct MapRenderer<B: MapBackend> {
    backend: B,
    settings: MapSettings,
    icons: ClusterIcons,
    mode: MapMode,
    handle: Option<MapHandle>,
    layers: Vec<LayerId>,
}

impl<B: MapBackend> MapRenderer<B> {
    pub fn new(backend: B, settings: MapSettings) -> Self {
        Self {
            backend,
            settings,
            icons: ClusterIcons::default(),
            mode: MapMode::default(),
            handle: None,
            layers: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn mode(&self) -> MapMode {
        self.mode
    }

    pub fn toggle_markers(&mut self) -> MapMode {
        self.mode.markers = !self.mode.markers;
        self.mode
    }

    pub fn toggle_heat(&mut self) -> MapMode {
        self.mode.heat = !self.mode.heat;
        self.mode
    }

    /// Layers added by the most recent pass.
    pub fn active_layers(&self) -> &[LayerId] {
        &self.layers
    }

    fn default_center(&self) -> GeoPoint {
        GeoPoint::new(self.settings.center[0], self.settings.center[1])
    }

    fn fail(
        &mut self,
        container_id: &str,
        error: RenderError,
    ) -> Result<RenderOutcome, RenderError> {
        // A failed pass leaves no stale data on the map.
        if let Some(map) = self.handle {
            for layer in self.layers.drain(..) {
                self.backend.remove_layer(map, layer);
            }
        }
        self.backend
            .show_indicator(container_id, &Indicator::Error(error.to_string()));
        Err(error)
    }

    /// Draw `sample` (indices into `records`) into the map container.
    pub fn render(
        &mut self,
        surface: &Surface,
        container_id: &str,
        sample: &[SamplePoint],
        records: &[Record],
    ) -> Result<RenderOutcome, RenderError> {
        let container = match surface.container(container_id) {
            Some(container) => container,
            None => return Ok(RenderOutcome::Skipped),
        };
        if !container.has_area() {
            return self.fail(container_id, RenderError::ZeroArea(container_id.to_string()));
        }
        if !self.backend.is_available() {
            return self.fail(
                container_id,
                RenderError::MapUnavailable("mapping library failed to load".to_string()),
            );
        }

        let map = match self.handle {
            Some(map) => map,
            None => {
                let map = match self.backend.create_map(container_id) {
                    Ok(map) => map,
                    Err(e) => return self.fail(container_id, e),
                };
                self.backend
                    .add_tile_layer(map, &self.settings.tile_url, &self.settings.attribution);
                self.handle = Some(map);
                map
            }
        };

        for layer in self.layers.drain(..) {
            self.backend.remove_layer(map, layer);
        }
        self.backend.clear_indicator(container_id);

        let points: Vec<GeoPoint> = sample
            .iter()
            .map(|p| GeoPoint::new(p.latitude, p.longitude))
            .collect();

        let center = self.default_center();
        if points.is_empty() {
            self.backend.set_view(map, center, self.settings.zoom);
            self.backend.show_indicator(container_id, &Indicator::NoData);
            return Ok(RenderOutcome::Rendered { marks: 0 });
        }

        if self.mode.markers {
            let popups = sample
                .iter()
                .map(|p| records.get(p.record_index).map(popup_html).unwrap_or_default());
            if self.settings.cluster_markers {
                let group = self.backend.create_cluster_group(map, &self.icons);
                for (point, popup) in points.iter().zip(popups) {
                    self.backend.add_to_cluster(group, *point, &popup);
                }
                self.layers.push(group);
            } else {
                for (point, popup) in points.iter().zip(popups) {
                    let layer = self.backend.add_marker(map, *point, &popup);
                    self.layers.push(layer);
                }
            }
        }

        if self.mode.heat {
            let layer = self.backend.create_heat_layer(
                map,
                &points,
                self.settings.heat_radius,
                self.settings.heat_blur,
            );
            self.layers.push(layer);
        }

        if self.mode.markers || self.mode.heat {
            self.backend
                .fit_bounds(map, &points, self.settings.fit_padding);
        } else {
            self.backend.set_view(map, center, self.settings.zoom);
        }

        log::debug!(
            "Map rendered {} points in {} layers",
            points.len(),
            self.layers.len()
        );
        Ok(RenderOutcome::Rendered {
            marks: points.len(),
        })
    }
}

#[cfg(test)]
#[path = "map_tests.rs"]
mod map_tests;
