//! Map layer to polygon bookkeeping.

use std::collections::HashMap;

use dashboard_common::PolygonId;

/// Id the map library gives a drawn layer.
pub type LayerId = u64;

/// Two-way mapping between map layers and stored polygons.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    by_layer: HashMap<LayerId, PolygonId>,
    by_polygon: HashMap<PolygonId, LayerId>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `layer` to `polygon`, replacing any previous binding of either.
    pub fn bind(&mut self, layer: LayerId, polygon: PolygonId) {
        self.unbind_layer(layer);
        self.unbind_polygon(polygon);
        self.by_layer.insert(layer, polygon);
        self.by_polygon.insert(polygon, layer);
    }

    pub fn unbind_layer(&mut self, layer: LayerId) -> Option<PolygonId> {
        let polygon = self.by_layer.remove(&layer)?;
        self.by_polygon.remove(&polygon);
        Some(polygon)
    }

    pub fn unbind_polygon(&mut self, polygon: PolygonId) -> Option<LayerId> {
        let layer = self.by_polygon.remove(&polygon)?;
        self.by_layer.remove(&layer);
        Some(layer)
    }

    pub fn polygon_for(&self, layer: LayerId) -> Option<PolygonId> {
        self.by_layer.get(&layer).copied()
    }

    pub fn layer_for(&self, polygon: PolygonId) -> Option<LayerId> {
        self.by_polygon.get(&polygon).copied()
    }

    /// Drops bindings whose polygon fails `keep`. Returns the dropped layers.
    pub fn retain(&mut self, mut keep: impl FnMut(PolygonId) -> bool) -> Vec<LayerId> {
        let dropped: Vec<LayerId> = self
            .by_layer
            .iter()
            .filter(|(_, polygon)| !keep(**polygon))
            .map(|(layer, _)| *layer)
            .collect();
        for layer in &dropped {
            self.unbind_layer(*layer);
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.by_layer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_layer.is_empty()
    }
}
