//! Common test fixtures for weather-dashboard tests.
//!
//! This module provides pre-defined polygons, rule sets and timestamps that
//! represent common dashboard scenarios.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dashboard_common::{
    close_ring, Color, ColorRule, DataSource, LatLng, NewPolygon, Operator, Polygon, TimeSeries,
    WeatherSample,
};
use uuid::Uuid;

pub const RED: &str = "#ef4444";
pub const GREEN: &str = "#22c55e";
pub const BLUE: &str = "#3b82f6";

/// Common polygon rings, given open (no closing duplicate).
pub mod rings {
    use dashboard_common::LatLng;

    /// Unit square with corners at (0,0) and (1,1).
    pub fn unit_square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    /// Right triangle with legs of length 3 along both axes.
    pub fn right_triangle() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(3.0, 0.0),
            LatLng::new(0.0, 3.0),
        ]
    }

    /// L-shaped (concave) hexagon.
    pub fn l_shape() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(1.0, 2.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(2.0, 1.0),
            LatLng::new(2.0, 0.0),
        ]
    }

    /// A small block in central Berlin.
    pub fn berlin_block() -> Vec<LatLng> {
        vec![
            LatLng::new(52.5200, 13.4000),
            LatLng::new(52.5200, 13.4200),
            LatLng::new(52.5300, 13.4200),
            LatLng::new(52.5300, 13.4000),
        ]
    }

    /// Three points on one line.
    pub fn collinear() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(2.0, 2.0),
        ]
    }
}

/// Reference instant used by time-dependent tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
}

/// `t0` plus the given number of hours.
pub fn t0_plus_hours(hours: i64) -> DateTime<Utc> {
    t0() + Duration::hours(hours)
}

/// Rules `[>=25 red, >=10 green, <10 blue]`.
pub fn banded_rules() -> Vec<ColorRule> {
    vec![
        ColorRule::new("hot", Operator::Ge, 25.0, Color::hex(RED)),
        ColorRule::new("mild", Operator::Ge, 10.0, Color::hex(GREEN)),
        ColorRule::new("cold", Operator::Lt, 10.0, Color::hex(BLUE)),
    ]
}

/// Temperature data source using [`banded_rules`].
pub fn temperature_source() -> DataSource {
    DataSource {
        rules: banded_rules(),
        ..DataSource::temperature()
    }
}

/// New-polygon input with a closed ring around `ring`.
pub fn new_polygon(name: &str, ring: Vec<LatLng>) -> NewPolygon {
    NewPolygon {
        name: name.to_string(),
        coordinates: close_ring(ring),
        data_source: "temperature".to_string(),
        color: Color::fallback(),
    }
}

/// A valid polygon with a fresh id and creation time `t0`.
pub fn polygon(name: &str, ring: Vec<LatLng>) -> Polygon {
    Polygon::create(new_polygon(name, ring), Uuid::new_v4(), t0())
        .expect("fixture ring must be valid")
}

/// Temperature-only series from `(hours after t0, value)` pairs.
pub fn temperature_series(points: &[(i64, f64)]) -> TimeSeries {
    let data = points
        .iter()
        .map(|(h, v)| WeatherSample::new(t0_plus_hours(*h), Some(*v), None))
        .collect();
    TimeSeries::new(data, LatLng::new(52.525, 13.41), t0())
}
