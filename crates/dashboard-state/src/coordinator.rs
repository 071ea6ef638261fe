//! Drawing-tool events applied to the store.

use dashboard_common::{
    close_ring, validate_vertices, Color, DashboardError, LatLng, NewPolygon, Polygon,
    PolygonUpdate,
};
use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::layers::{LayerId, LayerRegistry};
use crate::store::DashboardStore;

/// Keeps map layers and stored polygons in step.
pub struct MapCoordinator {
    store: DashboardStore,
    layers: LayerRegistry,
    active_data_source: String,
}

impl MapCoordinator {
    /// New polygons are bound to the store's first data source until
    /// another is selected.
    pub fn new(store: DashboardStore) -> Self {
        let active_data_source = store
            .state()
            .data_sources
            .first()
            .map(|ds| ds.id.clone())
            .unwrap_or_else(|| "temperature".to_string());
        Self {
            store,
            layers: LayerRegistry::new(),
            active_data_source,
        }
    }

    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DashboardStore {
        &mut self.store
    }

    pub fn into_store(self) -> DashboardStore {
        self.store
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn active_data_source(&self) -> &str {
        &self.active_data_source
    }

    pub fn set_active_data_source(&mut self, id: &str) -> StateResult<()> {
        if self.store.state().data_source(id).is_none() {
            return Err(DashboardError::DataSourceNotFound(id.to_string()).into());
        }
        self.active_data_source = id.to_string();
        Ok(())
    }

    pub fn drawing_started(&mut self) {
        self.store.set_is_drawing(true);
    }

    /// A shape was drawn: store it as a polygon and bind the layer.
    ///
    /// `vertices` is the open ring as drawn. Without a name the polygon is
    /// called `Polygon N`.
    pub fn shape_created(&mut self, layer: LayerId, vertices: Vec<LatLng>, name: Option<String>) -> StateResult<Polygon> {
        if self.layers.polygon_for(layer).is_some() {
            return Err(StateError::LayerAlreadyBound(layer));
        }
        validate_vertices(&vertices)?;

        let name = name.unwrap_or_else(|| format!("Polygon {}", self.store.state().polygons.len() + 1));
        let polygon = self.store.add_polygon(NewPolygon {
            name,
            coordinates: close_ring(vertices),
            data_source: self.active_data_source.clone(),
            color: Color::fallback(),
        })?;

        self.layers.bind(layer, polygon.id);
        self.store.set_is_drawing(false);
        debug!(layer, polygon = %polygon.id, "Layer bound");
        Ok(polygon)
    }

    /// A shape was reshaped: replace the ring and drop weather cached for
    /// the old centroid.
    pub fn shape_edited(&mut self, layer: LayerId, vertices: Vec<LatLng>) -> StateResult<()> {
        let id = self.layers.polygon_for(layer).ok_or(StateError::UnknownLayer(layer))?;
        validate_vertices(&vertices)?;

        self.store.update_polygon(
            id,
            PolygonUpdate {
                coordinates: Some(close_ring(vertices)),
                color: Some(Color::fallback()),
                weather_data: Some(None),
                time_series_data: Some(None),
                ..Default::default()
            },
        )?;
        info!(layer, polygon = %id, "Polygon reshaped, cached weather cleared");
        Ok(())
    }

    /// A layer was deleted from the map. Layers that were never bound are
    /// ignored.
    pub fn layer_removed(&mut self, layer: LayerId) -> StateResult<Option<Polygon>> {
        let Some(id) = self.layers.unbind_layer(layer) else {
            return Ok(None);
        };
        match self.store.remove_polygon(id) {
            Ok(polygon) => Ok(Some(polygon)),
            // already gone from the store
            Err(StateError::Dashboard(DashboardError::PolygonNotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Drops bindings to polygons that no longer exist. Returns the layers
    /// the map should remove.
    pub fn sync_layers(&mut self) -> Vec<LayerId> {
        let state = self.store.state();
        let dropped = self.layers.retain(|id| state.polygon(id).is_some());
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Stale layer bindings dropped");
        }
        dropped
    }
}
