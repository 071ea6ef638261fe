//! Polygon color resolution.
//!
//! Maps a weather value to a display color for a polygon at an arbitrary
//! timeline position:
//!
//! - [`geometry`]: shoelace centroid of a polygon ring
//! - [`rules`]: ordered threshold rules to a color
//! - [`sampler`]: nearest valid time-series sample within a tolerance
//! - [`resolve`]: composes the three for a polygon and a data source
//! - [`freshness`]: staleness checks that drive re-fetching
//!
//! Everything here is pure and synchronous; fetching is done elsewhere.

pub mod freshness;
pub mod geometry;
pub mod resolve;
pub mod rules;
pub mod sampler;

pub use freshness::{fetch_state, is_time_series_stale, is_weather_stale, FetchState, FreshnessPolicy};
pub use geometry::{bounding_box, bounding_box_center, centroid, GeometryError};
pub use resolve::{color_for_polygon_at_time, color_for_snapshot, variable_for, ColorResolution, ColorResolver};
pub use rules::{evaluate, format_temperature, format_value, matching_rule, resolve_color, temperature_label};
pub use sampler::{default_tolerance, sample_at, NotFound, SampledValue, DEFAULT_TOLERANCE_HOURS};
