//! The dashboard store: state plus change notifications.
//!
//! Every mutation goes through a method on [`DashboardStore`], which then
//! broadcasts a [`StoreEvent`] to subscribers. Sending with no subscribers is
//! not an error.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use dashboard_common::{
    BoundingBox, ColorRule, DashboardError, DataSource, DataSourceUpdate, LatLng, NewPolygon,
    Polygon, PolygonId, PolygonUpdate, TimelineMode,
};
use polygon_color::ColorResolver;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StateResult;
use crate::state::{DashboardState, PersistedState};

const EVENT_CAPACITY: usize = 64;

/// What changed in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    TimelineChanged,
    PolygonAdded(PolygonId),
    PolygonUpdated(PolygonId),
    PolygonRemoved(PolygonId),
    SelectionChanged(Option<PolygonId>),
    EditingChanged(Option<PolygonId>),
    DataSourceAdded(String),
    DataSourceUpdated(String),
    DataSourceRemoved(String),
    MapChanged,
    DrawingChanged(bool),
    Reset,
}

pub struct DashboardStore {
    state: DashboardState,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::with_state(DashboardState::default())
    }

    pub fn with_state(state: DashboardState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { state, events }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // Err only means nobody is listening
        let _ = self.events.send(event);
    }

    fn polygon_mut(&mut self, id: PolygonId) -> StateResult<&mut Polygon> {
        self.state
            .polygons
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DashboardError::PolygonNotFound(id.to_string()).into())
    }

    // ========================================================================
    // Timeline
    // ========================================================================

    pub fn set_timeline_mode(&mut self, mode: TimelineMode) {
        self.state.timeline.mode = mode;
        self.emit(StoreEvent::TimelineChanged);
    }

    pub fn set_selected_time(&mut self, time: DateTime<Utc>) {
        self.state.timeline.selected_time = Some(time);
        self.emit(StoreEvent::TimelineChanged);
    }

    pub fn set_time_range(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> StateResult<()> {
        if start > end {
            return Err(DashboardError::InvalidTime(format!("range start {start} is after end {end}")).into());
        }
        self.state.timeline.start_time = Some(start);
        self.state.timeline.end_time = Some(end);
        self.emit(StoreEvent::TimelineChanged);
        Ok(())
    }

    // ========================================================================
    // Polygons
    // ========================================================================

    /// Adds a polygon with a fresh id, stamped with the current time.
    pub fn add_polygon(&mut self, new: NewPolygon) -> StateResult<Polygon> {
        let polygon = Polygon::create(new, Uuid::new_v4(), Utc::now())?;
        info!(polygon = %polygon.name, id = %polygon.id, vertices = polygon.vertex_count(), "Polygon added");

        self.state.polygons.push(polygon.clone());
        self.emit(StoreEvent::PolygonAdded(polygon.id));
        Ok(polygon)
    }

    /// Removes a polygon, clearing the selection and editing markers that
    /// pointed at it.
    pub fn remove_polygon(&mut self, id: PolygonId) -> StateResult<Polygon> {
        let index = self
            .state
            .polygons
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DashboardError::PolygonNotFound(id.to_string()))?;
        let removed = self.state.polygons.remove(index);

        if self.state.selected_polygon == Some(id) {
            self.state.selected_polygon = None;
            self.emit(StoreEvent::SelectionChanged(None));
        }
        if self.state.editing_polygon == Some(id) {
            self.state.editing_polygon = None;
            self.emit(StoreEvent::EditingChanged(None));
        }

        info!(polygon = %removed.name, %id, "Polygon removed");
        self.emit(StoreEvent::PolygonRemoved(id));
        Ok(removed)
    }

    pub fn update_polygon(&mut self, id: PolygonId, update: PolygonUpdate) -> StateResult<()> {
        self.polygon_mut(id)?.apply(update)?;
        self.emit(StoreEvent::PolygonUpdated(id));
        Ok(())
    }

    /// Replaces a stored polygon wholesale, e.g. with the result of a fetch.
    pub fn replace_polygon(&mut self, polygon: Polygon) -> StateResult<()> {
        let id = polygon.id;
        *self.polygon_mut(id)? = polygon;
        self.emit(StoreEvent::PolygonUpdated(id));
        Ok(())
    }

    pub fn set_selected_polygon(&mut self, id: Option<PolygonId>) {
        self.state.selected_polygon = id;
        self.emit(StoreEvent::SelectionChanged(id));
    }

    pub fn set_editing_polygon(&mut self, id: Option<PolygonId>) {
        self.state.editing_polygon = id;
        self.emit(StoreEvent::EditingChanged(id));
    }

    /// Recolors every polygon for `target` using its own data source.
    ///
    /// Polygons whose data source is gone keep their current color. Returns
    /// how many polygons were recolored.
    pub fn recolor_at(&mut self, target: DateTime<Utc>, resolver: &ColorResolver) -> usize {
        let mut recolored = Vec::new();

        for polygon in &mut self.state.polygons {
            let Some(data_source) = self.state.data_sources.iter().find(|ds| ds.id == polygon.data_source) else {
                warn!(polygon = %polygon.name, data_source = %polygon.data_source, "Polygon refers to a missing data source");
                continue;
            };
            *polygon = resolver.apply_color_at_time(polygon, target, data_source);
            recolored.push(polygon.id);
        }

        debug!(count = recolored.len(), %target, "Polygons recolored");
        let count = recolored.len();
        for id in recolored {
            self.emit(StoreEvent::PolygonUpdated(id));
        }
        count
    }

    // ========================================================================
    // Data sources
    // ========================================================================

    /// Adds a data source under a fresh id.
    pub fn add_data_source(&mut self, name: impl Into<String>, field: impl Into<String>, rules: Vec<ColorRule>) -> DataSource {
        let data_source = DataSource {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            field: field.into(),
            rules,
        };
        self.state.data_sources.push(data_source.clone());
        self.emit(StoreEvent::DataSourceAdded(data_source.id.clone()));
        data_source
    }

    pub fn update_data_source(&mut self, id: &str, update: DataSourceUpdate) -> StateResult<()> {
        let data_source = self
            .state
            .data_sources
            .iter_mut()
            .find(|ds| ds.id == id)
            .ok_or_else(|| DashboardError::DataSourceNotFound(id.to_string()))?;

        if let Some(rules) = &update.rules {
            for rule in rules {
                rule.color.validate()?;
            }
        }
        data_source.apply(update);
        self.emit(StoreEvent::DataSourceUpdated(id.to_string()));
        Ok(())
    }

    pub fn remove_data_source(&mut self, id: &str) -> StateResult<DataSource> {
        let index = self
            .state
            .data_sources
            .iter()
            .position(|ds| ds.id == id)
            .ok_or_else(|| DashboardError::DataSourceNotFound(id.to_string()))?;
        let removed = self.state.data_sources.remove(index);
        self.emit(StoreEvent::DataSourceRemoved(removed.id.clone()));
        Ok(removed)
    }

    /// Drops data sources repeating an earlier id and adds the built-in wind
    /// speed source to states saved before it existed. Returns whether
    /// anything changed.
    pub fn migrate_data_sources(&mut self) -> bool {
        let mut seen = HashSet::new();
        let before = self.state.data_sources.len();
        self.state.data_sources.retain(|ds| {
            let first = seen.insert(ds.id.clone());
            if !first {
                warn!(data_source = %ds.id, "Dropping duplicate data source");
            }
            first
        });
        let mut changed = self.state.data_sources.len() != before;

        if self.state.data_source("windspeed").is_none() {
            info!("Adding wind speed data source");
            let wind = DataSource::wind_speed();
            let id = wind.id.clone();
            self.state.data_sources.push(wind);
            self.emit(StoreEvent::DataSourceAdded(id));
            changed = true;
        }
        changed
    }

    // ========================================================================
    // Map and drawing
    // ========================================================================

    pub fn set_map_center(&mut self, center: LatLng) {
        self.state.map.center = center;
        self.emit(StoreEvent::MapChanged);
    }

    pub fn set_map_zoom(&mut self, zoom: u8) {
        self.state.map.zoom = zoom;
        self.emit(StoreEvent::MapChanged);
    }

    pub fn set_map_bounds(&mut self, bounds: BoundingBox) {
        self.state.map.bounds = Some(bounds);
        self.emit(StoreEvent::MapChanged);
    }

    pub fn set_is_drawing(&mut self, drawing: bool) {
        self.state.is_drawing = drawing;
        self.emit(StoreEvent::DrawingChanged(drawing));
    }

    pub fn reset(&mut self) {
        self.state = DashboardState::default();
        self.emit(StoreEvent::Reset);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn persisted(&self) -> PersistedState {
        self.state.persisted()
    }

    /// Writes the persisted part of the state as JSON.
    ///
    /// The file is written beside the target and renamed over it, so a
    /// crash never leaves a truncated state file.
    pub async fn save(&self, path: &Path) -> StateResult<()> {
        let json = serde_json::to_vec_pretty(&self.persisted())?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), polygons = self.state.polygons.len(), "State saved");
        Ok(())
    }

    /// Reads a state file. A missing file yields the initial state.
    pub async fn load(path: &Path) -> StateResult<Self> {
        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No saved state, starting fresh");
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let persisted: PersistedState = serde_json::from_slice(&bytes)?;
        info!(
            path = %path.display(),
            polygons = persisted.polygons.len(),
            data_sources = persisted.data_sources.len(),
            "State loaded"
        );
        Ok(Self::with_state(DashboardState::from_persisted(persisted)))
    }
}
