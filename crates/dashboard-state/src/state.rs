//! Dashboard state values.

use dashboard_common::{BoundingBox, DataSource, LatLng, Polygon, PolygonId, TimelineState};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAP_CENTER: LatLng = LatLng { lat: 52.52, lng: 13.41 };
pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Map viewport. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub center: LatLng,
    pub zoom: u8,
    pub bounds: Option<BoundingBox>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
            bounds: None,
        }
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub polygons: Vec<Polygon>,
    pub data_sources: Vec<DataSource>,
    pub timeline: TimelineState,
    pub selected_polygon: Option<PolygonId>,
    pub editing_polygon: Option<PolygonId>,
    pub map: MapState,
    pub is_drawing: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            polygons: Vec::new(),
            data_sources: default_data_sources(),
            timeline: TimelineState::default(),
            selected_polygon: None,
            editing_polygon: None,
            map: MapState::default(),
            is_drawing: false,
        }
    }
}

impl DashboardState {
    /// Initial state with a persisted part restored over it.
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            polygons: persisted.polygons,
            data_sources: persisted.data_sources,
            timeline: persisted.timeline,
            ..Self::default()
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            polygons: self.polygons.clone(),
            data_sources: self.data_sources.clone(),
            timeline: self.timeline.clone(),
        }
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.id == id)
    }

    pub fn data_source(&self, id: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|ds| ds.id == id)
    }
}

/// The part of the state written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub polygons: Vec<Polygon>,
    #[serde(default = "default_data_sources")]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub timeline: TimelineState,
}

impl Default for PersistedState {
    fn default() -> Self {
        DashboardState::default().persisted()
    }
}

fn default_data_sources() -> Vec<DataSource> {
    vec![DataSource::temperature()]
}
