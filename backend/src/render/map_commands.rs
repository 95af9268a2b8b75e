//! [`MapBackend`] that keeps the map state as a list of serializable commands.
//!
//! The list only ever describes the current map: removing a layer drops the
//! commands that built it, and a new viewport or indicator replaces the old
//! one. The HTTP layer ships [`CommandMapBackend::snapshot`] to the browser,
//! where a small script replays it against the real mapping library.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::RenderError;
use crate::models::GeoPoint;

use super::map::{ClusterIcons, Indicator, LayerId, MapBackend, MapHandle};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand {
    CreateMap {
        map: MapHandle,
        container: String,
    },
    AddTileLayer {
        map: MapHandle,
        layer: LayerId,
        url: String,
        attribution: String,
    },
    AddMarker {
        map: MapHandle,
        layer: LayerId,
        point: GeoPoint,
        popup: String,
    },
    CreateClusterGroup {
        map: MapHandle,
        layer: LayerId,
        icons: ClusterIcons,
    },
    AddToCluster {
        cluster: LayerId,
        layer: LayerId,
        point: GeoPoint,
        popup: String,
    },
    CreateHeatLayer {
        map: MapHandle,
        layer: LayerId,
        points: Vec<GeoPoint>,
        radius: u32,
        blur: u32,
    },
    FitBounds {
        map: MapHandle,
        south_west: GeoPoint,
        north_east: GeoPoint,
        padding: u32,
    },
    SetView {
        map: MapHandle,
        center: GeoPoint,
        zoom: u8,
    },
    ShowIndicator {
        container: String,
        indicator: Indicator,
    },
    ClearIndicator {
        container: String,
    },
}

impl MapCommand {
    /// Layer created by this command, if any.
    fn created_layer(&self) -> Option<LayerId> {
        match self {
            MapCommand::AddTileLayer { layer, .. }
            | MapCommand::AddMarker { layer, .. }
            | MapCommand::CreateClusterGroup { layer, .. }
            | MapCommand::AddToCluster { layer, .. }
            | MapCommand::CreateHeatLayer { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    fn is_view(&self) -> bool {
        matches!(self, MapCommand::FitBounds { .. } | MapCommand::SetView { .. })
    }

    /// Container whose indicator this command sets or clears.
    fn indicator_container(&self) -> Option<&str> {
        match self {
            MapCommand::ShowIndicator { container, .. }
            | MapCommand::ClearIndicator { container } => Some(container.as_str()),
            _ => None,
        }
    }
}

/// Bounding box of a point set as (south-west, north-east).
pub fn bounds(points: &[GeoPoint]) -> Option<(GeoPoint, GeoPoint)> {
    let first = points.first()?;
    let mut sw = *first;
    let mut ne = *first;
    for p in &points[1..] {
        sw.latitude = sw.latitude.min(p.latitude);
        sw.longitude = sw.longitude.min(p.longitude);
        ne.latitude = ne.latitude.max(p.latitude);
        ne.longitude = ne.longitude.max(p.longitude);
    }
    Some((sw, ne))
}

/// Recording backend.
#[derive(Debug, Clone)]
pub struct CommandMapBackend {
    available: bool,
    next_map: u32,
    next_layer: u32,
    commands: Vec<CommandEntry>,
    live: HashSet<LayerId>,
}

#[derive(Debug, Clone)]
struct CommandEntry {
    command: MapCommand,
    /// Cluster the command's layer belongs to
    parent: Option<LayerId>,
}

impl Default for CommandMapBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandMapBackend {
    pub fn new() -> Self {
        Self {
            available: true,
            next_map: 0,
            next_layer: 0,
            commands: Vec::new(),
            live: HashSet::new(),
        }
    }

    /// Backend whose library "failed to load".
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    fn record(&mut self, command: MapCommand, parent: Option<LayerId>) {
        if command.is_view() {
            self.commands.retain(|e| !e.command.is_view());
        }
        if let Some(container) = command.indicator_container() {
            self.commands
                .retain(|e| e.command.indicator_container() != Some(container));
        }
        if let Some(layer) = command.created_layer() {
            self.live.insert(layer);
        }
        self.commands.push(CommandEntry { command, parent });
    }

    fn new_layer(&mut self) -> LayerId {
        self.next_layer += 1;
        LayerId(self.next_layer)
    }

    /// Commands describing the current map, in the order they were issued.
    pub fn commands(&self) -> Vec<&MapCommand> {
        self.commands.iter().map(|e| &e.command).collect()
    }

    pub fn count(&self, pred: impl Fn(&MapCommand) -> bool) -> usize {
        self.commands.iter().filter(|e| pred(&e.command)).count()
    }

    pub fn maps_created(&self) -> usize {
        self.count(|c| matches!(c, MapCommand::CreateMap { .. }))
    }

    /// Layers currently on the map (tile layers included).
    pub fn live_layers(&self) -> &HashSet<LayerId> {
        &self.live
    }

    /// Indicator currently shown on `container`, if any.
    pub fn indicator(&self, container: &str) -> Option<&Indicator> {
        self.commands.iter().find_map(|e| match &e.command {
            MapCommand::ShowIndicator {
                container: c,
                indicator,
            } if c == container => Some(indicator),
            _ => None,
        })
    }

    /// Command list that rebuilds the current map state from scratch.
    pub fn snapshot(&self) -> Vec<MapCommand> {
        self.commands.iter().map(|e| e.command.clone()).collect()
    }
}

impl MapBackend for CommandMapBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create_map(&mut self, container_id: &str) -> Result<MapHandle, RenderError> {
        if !self.available {
            return Err(RenderError::MapUnavailable(
                "mapping library failed to load".to_string(),
            ));
        }
        self.next_map += 1;
        let map = MapHandle(self.next_map);
        self.record(
            MapCommand::CreateMap {
                map,
                container: container_id.to_string(),
            },
            None,
        );
        Ok(map)
    }

    fn add_tile_layer(&mut self, map: MapHandle, url: &str, attribution: &str) -> LayerId {
        let layer = self.new_layer();
        self.record(
            MapCommand::AddTileLayer {
                map,
                layer,
                url: url.to_string(),
                attribution: attribution.to_string(),
            },
            None,
        );
        layer
    }

    fn add_marker(&mut self, map: MapHandle, point: GeoPoint, popup: &str) -> LayerId {
        let layer = self.new_layer();
        self.record(
            MapCommand::AddMarker {
                map,
                layer,
                point,
                popup: popup.to_string(),
            },
            None,
        );
        layer
    }

    fn create_cluster_group(&mut self, map: MapHandle, icons: &ClusterIcons) -> LayerId {
        let layer = self.new_layer();
        self.record(
            MapCommand::CreateClusterGroup {
                map,
                layer,
                icons: *icons,
            },
            None,
        );
        layer
    }

    fn add_to_cluster(&mut self, cluster: LayerId, point: GeoPoint, popup: &str) -> LayerId {
        let layer = self.new_layer();
        self.record(
            MapCommand::AddToCluster {
                cluster,
                layer,
                point,
                popup: popup.to_string(),
            },
            Some(cluster),
        );
        layer
    }

    fn create_heat_layer(
        &mut self,
        map: MapHandle,
        points: &[GeoPoint],
        radius: u32,
        blur: u32,
    ) -> LayerId {
        let layer = self.new_layer();
        self.record(
            MapCommand::CreateHeatLayer {
                map,
                layer,
                points: points.to_vec(),
                radius,
                blur,
            },
            None,
        );
        layer
    }

    fn remove_layer(&mut self, _map: MapHandle, layer: LayerId) {
        // Markers inside a removed cluster go with it.
        let live = &mut self.live;
        self.commands.retain(|e| {
            let doomed = e.parent == Some(layer) || e.command.created_layer() == Some(layer);
            if doomed {
                if let Some(created) = e.command.created_layer() {
                    live.remove(&created);
                }
            }
            !doomed
        });
        live.remove(&layer);
    }

    fn fit_bounds(&mut self, map: MapHandle, points: &[GeoPoint], padding: u32) {
        if let Some((south_west, north_east)) = bounds(points) {
            self.record(
                MapCommand::FitBounds {
                    map,
                    south_west,
                    north_east,
                    padding,
                },
                None,
            );
        }
    }

    fn set_view(&mut self, map: MapHandle, center: GeoPoint, zoom: u8) {
        self.record(MapCommand::SetView { map, center, zoom }, None);
    }

    fn show_indicator(&mut self, container_id: &str, indicator: &Indicator) {
        self.record(
            MapCommand::ShowIndicator {
                container: container_id.to_string(),
                indicator: indicator.clone(),
            },
            None,
        );
    }

    fn clear_indicator(&mut self, container_id: &str) {
        self.record(
            MapCommand::ClearIndicator {
                container: container_id.to_string(),
            },
            None,
        );
    }
}
