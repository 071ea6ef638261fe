//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// A geographic bounding box in degrees.
///
/// Serialized as `[[min_lat, min_lng], [max_lat, max_lng]]`, the corner
/// layout used for map bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLng; 2]", into = "[LatLng; 2]")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty slice.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(first.lat, first.lng, first.lat, first.lng);
        for p in &points[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.min_lng = bbox.min_lng.min(p.lng);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.max_lng = bbox.max_lng.max(p.lng);
        }
        Some(bbox)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Whether `p` lies inside the box grown by `epsilon` on every side.
    pub fn contains_approx(&self, p: &LatLng, epsilon: f64) -> bool {
        p.lat >= self.min_lat - epsilon
            && p.lat <= self.max_lat + epsilon
            && p.lng >= self.min_lng - epsilon
            && p.lng <= self.max_lng + epsilon
    }
}

impl From<[LatLng; 2]> for BoundingBox {
    fn from(corners: [LatLng; 2]) -> Self {
        Self::new(corners[0].lat, corners[0].lng, corners[1].lat, corners[1].lng)
    }
}

impl From<BoundingBox> for [LatLng; 2] {
    fn from(b: BoundingBox) -> Self {
        [
            LatLng::new(b.min_lat, b.min_lng),
            LatLng::new(b.max_lat, b.max_lng),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(&[
            LatLng::new(1.0, 5.0),
            LatLng::new(-2.0, 7.0),
            LatLng::new(3.0, 6.0),
        ])
        .unwrap();
        assert_eq!(bbox, BoundingBox::new(-2.0, 5.0, 3.0, 7.0));
        assert_eq!(bbox.center(), LatLng::new(0.5, 6.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_serializes_as_corner_pairs() {
        let json = serde_json::to_string(&BoundingBox::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
    }
}
