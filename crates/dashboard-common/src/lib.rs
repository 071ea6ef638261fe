//! Common types and utilities shared across the weather dashboard crates.

pub mod bbox;
pub mod color;
pub mod error;
pub mod geo;
pub mod polygon;
pub mod rule;
pub mod time;
pub mod weather;

pub use bbox::BoundingBox;
pub use color::{Color, FALLBACK_COLOR_HEX};
pub use error::{DashboardError, DashboardResult};
pub use geo::{
    close_ring, distinct_vertex_count, is_closed, validate_ring, validate_vertices, LatLng,
    MAX_VERTICES, MIN_VERTICES,
};
pub use polygon::{NewPolygon, Polygon, PolygonId, PolygonUpdate};
pub use rule::{ColorRule, DataSource, DataSourceUpdate, Operator, WeatherVariable, PRESET_COLORS};
pub use time::{
    default_timeline_window, parse_timestamp, slider_to_time, time_to_slider, timeline_hours,
    timeline_window, TimeRange, TimelineMode, TimelineState,
};
pub use weather::{TimeSeries, WeatherSample, WeatherSnapshot};
