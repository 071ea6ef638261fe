//! Polygon centroid and bounding box.

use dashboard_common::{BoundingBox, DashboardError, LatLng};

/// Below this absolute signed area a ring is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl From<GeometryError> for DashboardError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidGeometry(msg) => DashboardError::InvalidGeometry(msg),
        }
    }
}

/// Drops the closing duplicate of a closed ring.
fn open_ring(ring: &[LatLng]) -> &[LatLng] {
    if ring.len() > 1 && ring.first() == ring.last() {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}

/// Area-weighted (shoelace) centroid of a ring given as `(lat, lng)` points.
///
/// The ring may be closed or open. Rings whose signed area is effectively
/// zero (collinear or coincident points) fall back to the vertex mean.
pub fn centroid(ring: &[LatLng]) -> Result<LatLng, GeometryError> {
    if ring.is_empty() {
        return Err(GeometryError::InvalidGeometry(
            "Cannot calculate centroid of empty polygon".to_string(),
        ));
    }

    let points = open_ring(ring);
    let n = points.len();

    let mut area = 0.0;
    let mut c_lat = 0.0;
    let mut c_lng = 0.0;

    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let cross = p.lat * q.lng - q.lat * p.lng;
        area += cross;
        c_lat += (p.lat + q.lat) * cross;
        c_lng += (p.lng + q.lng) * cross;
    }

    area /= 2.0;

    if area.abs() < DEGENERATE_AREA {
        return Ok(vertex_mean(points));
    }

    Ok(LatLng::new(c_lat / (6.0 * area), c_lng / (6.0 * area)))
}

fn vertex_mean(points: &[LatLng]) -> LatLng {
    let n = points.len() as f64;
    let (sum_lat, sum_lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    LatLng::new(sum_lat / n, sum_lng / n)
}

/// Bounding box of the ring.
pub fn bounding_box(ring: &[LatLng]) -> Option<BoundingBox> {
    BoundingBox::from_points(ring)
}

/// Center of the ring's bounding box.
pub fn bounding_box_center(ring: &[LatLng]) -> Result<LatLng, GeometryError> {
    bounding_box(ring)
        .map(|b| b.center())
        .ok_or_else(|| GeometryError::InvalidGeometry("Cannot calculate center of empty polygon".to_string()))
}
