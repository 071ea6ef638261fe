//! Drawing-tool events through the map coordinator.

use chrono::TimeDelta;
use dashboard_common::{Color, LatLng, WeatherSnapshot};
use dashboard_state::{DashboardStore, MapCoordinator, StateError, StoreEvent};
use polygon_color::ColorResolver;
use test_utils::{rings, t0, t0_plus_hours, temperature_series, GREEN};

fn coordinator() -> MapCoordinator {
    MapCoordinator::new(DashboardStore::new())
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_shape_created_stores_closed_ring() {
    let mut coord = coordinator();
    coord.drawing_started();
    assert!(coord.store().state().is_drawing);

    let polygon = coord.shape_created(11, rings::unit_square(), None).unwrap();
    assert_eq!(polygon.name, "Polygon 1");
    assert_eq!(polygon.coordinates.len(), 5);
    assert_eq!(polygon.coordinates.first(), polygon.coordinates.last());
    assert_eq!(polygon.data_source, "temperature");
    assert_eq!(polygon.color, Color::fallback());

    assert_eq!(coord.layers().polygon_for(11), Some(polygon.id));
    assert!(!coord.store().state().is_drawing);
}

#[test]
fn test_shape_created_uses_active_data_source() {
    let mut coord = coordinator();
    coord.store_mut().migrate_data_sources();
    coord.set_active_data_source("windspeed").unwrap();
    assert!(coord.set_active_data_source("humidity").is_err());

    let polygon = coord
        .shape_created(1, rings::right_triangle(), Some("Wind farm".to_string()))
        .unwrap();
    assert_eq!(polygon.name, "Wind farm");
    assert_eq!(polygon.data_source, "windspeed");
}

#[test]
fn test_shape_created_rejects_bad_vertex_counts() {
    let mut coord = coordinator();

    let two = vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)];
    assert!(coord.shape_created(1, two, None).is_err());

    let thirteen: Vec<LatLng> = (0..13)
        .map(|i| {
            let a = f64::from(i) * std::f64::consts::TAU / 13.0;
            LatLng::new(a.sin(), a.cos())
        })
        .collect();
    let err = coord.shape_created(2, thirteen, None).unwrap_err();
    assert!(err.is_user_error());

    assert!(coord.store().state().polygons.is_empty());
    assert!(coord.layers().is_empty());
}

#[test]
fn test_layer_cannot_be_bound_twice() {
    let mut coord = coordinator();
    coord.shape_created(1, rings::unit_square(), None).unwrap();
    let err = coord.shape_created(1, rings::unit_square(), None).unwrap_err();
    assert!(matches!(err, StateError::LayerAlreadyBound(1)));
}

// ============================================================================
// Editing and removal
// ============================================================================

#[test]
fn test_shape_edited_clears_cached_weather() {
    let mut coord = coordinator();
    let polygon = coord.shape_created(1, rings::unit_square(), None).unwrap();

    let mut cached = polygon.clone();
    cached.color = Color::hex(GREEN);
    cached.weather_data = Some(WeatherSnapshot {
        temperature: 15.0,
        wind_speed: 2.0,
        timestamp: t0(),
        centroid: LatLng::new(0.5, 0.5),
    });
    cached.time_series_data = Some(temperature_series(&[(0, 15.0)]));
    coord.store_mut().replace_polygon(cached).unwrap();

    coord.shape_edited(1, rings::l_shape()).unwrap();

    let edited = coord.store().state().polygon(polygon.id).unwrap();
    assert_eq!(edited.vertex_count(), 6);
    assert!(edited.weather_data.is_none());
    assert!(edited.time_series_data.is_none());
    assert_eq!(edited.color, Color::fallback());
}

#[test]
fn test_shape_edited_unknown_layer() {
    let mut coord = coordinator();
    let err = coord.shape_edited(99, rings::unit_square()).unwrap_err();
    assert!(matches!(err, StateError::UnknownLayer(99)));
}

#[test]
fn test_layer_removed() {
    let mut coord = coordinator();
    let polygon = coord.shape_created(1, rings::unit_square(), None).unwrap();
    let mut events = coord.store().subscribe();

    let removed = coord.layer_removed(1).unwrap().unwrap();
    assert_eq!(removed.id, polygon.id);
    assert!(coord.store().state().polygons.is_empty());
    assert!(coord.layers().is_empty());
    assert_eq!(events.try_recv().unwrap(), StoreEvent::PolygonRemoved(polygon.id));

    assert!(coord.layer_removed(1).unwrap().is_none());
}

#[test]
fn test_sync_layers_drops_orphans() {
    let mut coord = coordinator();
    let a = coord.shape_created(1, rings::unit_square(), None).unwrap();
    coord.shape_created(2, rings::right_triangle(), None).unwrap();

    coord.store_mut().remove_polygon(a.id).unwrap();
    assert_eq!(coord.sync_layers(), vec![1]);
    assert_eq!(coord.layers().len(), 1);
    assert!(coord.sync_layers().is_empty());
}

// ============================================================================
// Timeline recoloring
// ============================================================================

#[test]
fn test_recolor_at_timeline_position() {
    let mut coord = coordinator();
    let polygon = coord.shape_created(1, rings::berlin_block(), None).unwrap();

    let mut with_series = polygon.clone();
    with_series.time_series_data = Some(temperature_series(&[(0, 5.0), (1, 12.0), (3, 26.0)]));
    coord.store_mut().replace_polygon(with_series).unwrap();

    let resolver = ColorResolver::default();
    assert_eq!(coord.store_mut().recolor_at(t0_plus_hours(1), &resolver), 1);
    let colored = coord.store().state().polygon(polygon.id).unwrap().clone();
    assert_eq!(colored.color, Color::hex(GREEN));
    assert_eq!(colored.weather_data.as_ref().unwrap().temperature, 12.0);

    coord.store_mut().recolor_at(t0_plus_hours(10), &resolver);
    let grayed = coord.store().state().polygon(polygon.id).unwrap();
    assert_eq!(grayed.color, Color::fallback());
    assert_eq!(grayed.weather_data, colored.weather_data);

    let narrow = ColorResolver::new(TimeDelta::minutes(10));
    coord.store_mut().recolor_at(t0_plus_hours(2), &narrow);
    assert_eq!(coord.store().state().polygon(polygon.id).unwrap().color, Color::fallback());
}
