//! User-drawn polygons and their cached weather data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::error::DashboardResult;
use crate::geo::{distinct_vertex_count, validate_ring, LatLng};
use crate::weather::{TimeSeries, WeatherSnapshot};

pub type PolygonId = Uuid;

/// A polygon on the map, colored by the rules of its data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub id: PolygonId,
    pub name: String,
    /// Closed ring: the first vertex is repeated at the end.
    pub coordinates: Vec<LatLng>,
    /// Id of the data source whose rules color this polygon.
    pub data_source: String,
    pub color: Color,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<WeatherSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series_data: Option<TimeSeries>,
}

/// Everything needed to create a polygon; id and creation time are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolygon {
    pub name: String,
    pub coordinates: Vec<LatLng>,
    pub data_source: String,
    pub color: Color,
}

/// Partial update for a polygon; `None` fields are left untouched.
///
/// The nested options on the cached data allow clearing it with `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct PolygonUpdate {
    pub name: Option<String>,
    pub coordinates: Option<Vec<LatLng>>,
    pub data_source: Option<String>,
    pub color: Option<Color>,
    pub weather_data: Option<Option<WeatherSnapshot>>,
    pub time_series_data: Option<Option<TimeSeries>>,
}

impl Polygon {
    /// Create a polygon from user input, validating its ring.
    pub fn create(new: NewPolygon, id: PolygonId, created_at: DateTime<Utc>) -> DashboardResult<Self> {
        validate_ring(&new.coordinates)?;
        Ok(Self {
            id,
            name: new.name,
            coordinates: new.coordinates,
            data_source: new.data_source,
            color: new.color,
            created_at,
            weather_data: None,
            time_series_data: None,
        })
    }

    /// Number of distinct vertices (closing duplicate excluded).
    pub fn vertex_count(&self) -> usize {
        distinct_vertex_count(&self.coordinates)
    }

    /// Apply a partial update. A new ring is validated before anything changes.
    pub fn apply(&mut self, update: PolygonUpdate) -> DashboardResult<()> {
        if let Some(coordinates) = &update.coordinates {
            validate_ring(coordinates)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(coordinates) = update.coordinates {
            self.coordinates = coordinates;
        }
        if let Some(data_source) = update.data_source {
            self.data_source = data_source;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(weather_data) = update.weather_data {
            self.weather_data = weather_data;
        }
        if let Some(time_series_data) = update.time_series_data {
            self.time_series_data = time_series_data;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::close_ring;

    fn triangle() -> NewPolygon {
        NewPolygon {
            name: "Field".to_string(),
            coordinates: close_ring(vec![
                LatLng::new(52.0, 13.0),
                LatLng::new(52.1, 13.0),
                LatLng::new(52.0, 13.1),
            ]),
            data_source: "temperature".to_string(),
            color: Color::fallback(),
        }
    }

    #[test]
    fn test_create_validates_ring() {
        let mut bad = triangle();
        bad.coordinates.pop();
        assert!(Polygon::create(bad, Uuid::new_v4(), Utc::now()).is_err());

        let ok = Polygon::create(triangle(), Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(ok.vertex_count(), 3);
    }

    #[test]
    fn test_apply_rejects_bad_ring_without_partial_update() {
        let mut p = Polygon::create(triangle(), Uuid::new_v4(), Utc::now()).unwrap();
        let result = p.apply(PolygonUpdate {
            name: Some("Renamed".to_string()),
            coordinates: Some(vec![LatLng::new(0.0, 0.0)]),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(p.name, "Field");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let p = Polygon::create(triangle(), Uuid::nil(), Utc::now()).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("dataSource").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("weatherData").is_none());
    }
}
