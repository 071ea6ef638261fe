//! Dashboard application state.
//!
//! [`DashboardStore`] owns the polygons, data sources and timeline and
//! notifies subscribers of every change. [`MapCoordinator`] turns drawing
//! tool events into store mutations and tracks which map layer shows which
//! polygon.

pub mod coordinator;
pub mod error;
pub mod layers;
pub mod state;
pub mod store;

pub use coordinator::MapCoordinator;
pub use error::{StateError, StateResult};
pub use layers::{LayerId, LayerRegistry};
pub use state::{DashboardState, MapState, PersistedState, DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM};
pub use store::{DashboardStore, StoreEvent};
