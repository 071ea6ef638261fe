//! Geographic coordinates and polygon ring rules.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Minimum number of distinct vertices in a polygon ring.
pub const MIN_VERTICES: usize = 3;

/// Maximum number of distinct vertices in a polygon ring.
pub const MAX_VERTICES: usize = 12;

/// A geographic position in degrees.
///
/// Serialized as a `[lat, lng]` array, which is the layout the persisted
/// dashboard state uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Returns true when the last vertex repeats the first one.
pub fn is_closed(ring: &[LatLng]) -> bool {
    ring.len() > 1 && ring.first() == ring.last()
}

/// Number of vertices, not counting a closing duplicate.
pub fn distinct_vertex_count(ring: &[LatLng]) -> usize {
    if is_closed(ring) {
        ring.len() - 1
    } else {
        ring.len()
    }
}

/// Appends the first vertex when the ring is open.
pub fn close_ring(mut vertices: Vec<LatLng>) -> Vec<LatLng> {
    if let Some(first) = vertices.first().copied() {
        if !is_closed(&vertices) {
            vertices.push(first);
        }
    }
    vertices
}

/// Checks the vertex count of a shape coming from a drawing tool.
///
/// Accepts open or closed rings.
pub fn validate_vertices(vertices: &[LatLng]) -> DashboardResult<()> {
    let count = distinct_vertex_count(vertices);
    if count < MIN_VERTICES {
        return Err(DashboardError::InvalidRing(format!(
            "Polygon must have at least {} points, got {}",
            MIN_VERTICES, count
        )));
    }
    if count > MAX_VERTICES {
        return Err(DashboardError::InvalidRing(format!(
            "Polygon cannot have more than {} points, got {}",
            MAX_VERTICES, count
        )));
    }
    if let Some(bad) = vertices.iter().find(|p| !p.is_valid()) {
        return Err(DashboardError::InvalidRing(format!(
            "Coordinate out of range: {}",
            bad
        )));
    }
    Ok(())
}

/// Validates a stored polygon ring: 3 to 12 vertices plus the closing duplicate.
pub fn validate_ring(ring: &[LatLng]) -> DashboardResult<()> {
    if !is_closed(ring) {
        return Err(DashboardError::InvalidRing(
            "Polygon must be closed (first and last points should match)".to_string(),
        ));
    }
    validate_vertices(ring)
}
