//! End-to-end tests for polygon color resolution.

use chrono::TimeDelta;
use dashboard_common::{close_ring, Color, DataSource, LatLng, WeatherSample, WeatherVariable};
use polygon_color::{
    bounding_box, centroid, color_for_polygon_at_time, color_for_snapshot, resolve_color,
    sample_at, ColorResolver, NotFound,
};
use test_utils::{
    assert_approx_eq, banded_rules, create_hourly_series, create_series_with_gaps, polygon, rings,
    t0, t0_plus_hours, temperature_series, temperature_source, BLUE, GREEN, RED,
};

// ============================================================================
// Centroid
// ============================================================================

#[test]
fn test_centroid_inside_bounding_box() {
    for ring in [
        rings::unit_square(),
        rings::right_triangle(),
        rings::l_shape(),
        rings::berlin_block(),
    ] {
        let c = centroid(&ring).unwrap();
        let bbox = bounding_box(&ring).unwrap();
        assert!(bbox.contains_approx(&c, 1e-9), "{c} outside {bbox:?}");
    }
}

#[test]
fn test_centroid_ignores_closing_vertex() {
    for ring in [rings::right_triangle(), rings::l_shape(), rings::berlin_block()] {
        let open = centroid(&ring).unwrap();
        let closed = centroid(&close_ring(ring)).unwrap();
        assert_approx_eq!(open.lat, closed.lat, 1e-12);
        assert_approx_eq!(open.lng, closed.lng, 1e-12);
    }
}

#[test]
fn test_centroid_right_triangle() {
    let c = centroid(&rings::right_triangle()).unwrap();
    assert_approx_eq!(c.lat, 1.0, 1e-12);
    assert_approx_eq!(c.lng, 1.0, 1e-12);
}

#[test]
fn test_centroid_concave() {
    // 2x2 square minus its upper 1x1 corner
    let c = centroid(&rings::l_shape()).unwrap();
    assert_approx_eq!(c.lat, 2.5 / 3.0, 1e-12);
    assert_approx_eq!(c.lng, 2.5 / 3.0, 1e-12);
}

#[test]
fn test_centroid_winding_independent() {
    let mut ring = rings::l_shape();
    let forward = centroid(&ring).unwrap();
    ring.reverse();
    let backward = centroid(&ring).unwrap();
    assert_approx_eq!(forward.lat, backward.lat, 1e-12);
    assert_approx_eq!(forward.lng, backward.lng, 1e-12);
}

#[test]
fn test_centroid_degenerate_is_vertex_mean() {
    let c = centroid(&rings::collinear()).unwrap();
    assert_eq!(c, LatLng::new(1.0, 1.0));
}

#[test]
fn test_centroid_empty() {
    assert!(centroid(&[]).is_err());
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn test_banded_rules() {
    let rules = banded_rules();
    assert_eq!(resolve_color(30.0, &rules), Color::hex(RED));
    assert_eq!(resolve_color(15.0, &rules), Color::hex(GREEN));
    assert_eq!(resolve_color(5.0, &rules), Color::hex(BLUE));
    assert_eq!(resolve_color(10.0, &rules), Color::hex(GREEN));
    assert_eq!(resolve_color(25.0, &rules), Color::hex(RED));
}

#[test]
fn test_rule_order_does_not_matter() {
    let mut rules = banded_rules();
    rules.reverse();
    assert_eq!(resolve_color(30.0, &rules), Color::hex(RED));
    assert_eq!(resolve_color(5.0, &rules), Color::hex(BLUE));
}

#[test]
fn test_no_rules_is_fallback() {
    assert_eq!(resolve_color(12.0, &[]), Color::fallback());
    assert_eq!(resolve_color(12.0, &[]).to_hex(), "#9ca3af");
}

// ============================================================================
// Sampler
// ============================================================================

#[test]
fn test_sampler_skips_null_values() {
    let mut series = temperature_series(&[(0, 5.0), (3, 7.0)]);
    series.data.insert(1, WeatherSample::new(t0_plus_hours(1), None, Some(4.0)));

    let s = sample_at(&series, t0_plus_hours(1), WeatherVariable::Temperature, TimeDelta::hours(2)).unwrap();
    assert_eq!(s.value, 5.0);
    assert_eq!(s.timestamp, t0());
}

#[test]
fn test_sampler_out_of_tolerance() {
    let series = temperature_series(&[(0, 5.0)]);
    let err = sample_at(&series, t0_plus_hours(3), WeatherVariable::Temperature, TimeDelta::hours(2))
        .unwrap_err();
    assert!(matches!(err, NotFound::OutOfTolerance { distance_minutes: 180, .. }));
}

#[test]
fn test_sampler_tolerance_is_inclusive() {
    let series = temperature_series(&[(0, 5.0)]);
    let s = sample_at(&series, t0_plus_hours(2), WeatherVariable::Temperature, TimeDelta::hours(2));
    assert!(s.is_ok());
}

#[test]
fn test_sampler_wind_speed_missing() {
    let series = temperature_series(&[(0, 5.0)]);
    let err = sample_at(&series, t0(), WeatherVariable::WindSpeed, TimeDelta::hours(2)).unwrap_err();
    assert_eq!(err, NotFound::NoValidSamples(WeatherVariable::WindSpeed));
}

#[test]
fn test_sampler_month_long_series_tie_keeps_earlier() {
    let series = create_hourly_series(t0(), 720);
    let target = t0_plus_hours(6) + TimeDelta::minutes(30);

    let s = sample_at(&series, target, WeatherVariable::WindSpeed, TimeDelta::hours(2)).unwrap();
    assert_eq!(s.value, 6.0);
    assert_eq!(s.timestamp, t0_plus_hours(6));
    assert_eq!(s.distance, TimeDelta::minutes(30));
}

#[test]
fn test_sampler_steps_over_gaps() {
    // even hours have no temperature
    let series = create_series_with_gaps(t0(), 48, 2);

    let s = sample_at(&series, t0_plus_hours(4), WeatherVariable::Temperature, TimeDelta::hours(2)).unwrap();
    assert_eq!(s.timestamp, t0_plus_hours(3));

    let wind = sample_at(&series, t0_plus_hours(4), WeatherVariable::WindSpeed, TimeDelta::hours(2)).unwrap();
    assert_eq!(wind.timestamp, t0_plus_hours(4));
}

// ============================================================================
// Orchestration
// ============================================================================

#[test]
fn test_polygon_color_within_tolerance() {
    let mut p = polygon("Block", rings::berlin_block());
    p.time_series_data = Some(temperature_series(&[(0, 5.0), (1, 12.0), (3, 26.0)]));

    let res = color_for_polygon_at_time(&p, t0_plus_hours(1), &temperature_source());
    assert_eq!(res.color, Color::hex(GREEN));

    let snap = res.snapshot.unwrap();
    assert_eq!(snap.temperature, 12.0);
    assert_eq!(snap.wind_speed, 0.0);
    assert_eq!(snap.timestamp, t0_plus_hours(1));
    assert_eq!(snap.centroid, LatLng::new(52.525, 13.41));
}

#[test]
fn test_polygon_color_out_of_tolerance() {
    let mut p = polygon("Block", rings::berlin_block());
    p.time_series_data = Some(temperature_series(&[(0, 5.0), (1, 12.0), (3, 26.0)]));

    let res = color_for_polygon_at_time(&p, t0_plus_hours(10), &temperature_source());
    assert_eq!(res.color, Color::fallback());
    assert!(res.snapshot.is_none());
}

#[test]
fn test_polygon_without_series() {
    let p = polygon("Block", rings::berlin_block());
    let res = color_for_polygon_at_time(&p, t0(), &temperature_source());
    assert_eq!(res.color, Color::fallback());
    assert!(!res.has_data());
}

#[test]
fn test_narrow_tolerance() {
    let mut p = polygon("Block", rings::berlin_block());
    p.time_series_data = Some(temperature_series(&[(0, 12.0)]));

    let resolver = ColorResolver::new(TimeDelta::minutes(30));
    let res = resolver.color_for_polygon_at_time(&p, t0_plus_hours(1), &temperature_source());
    assert!(res.snapshot.is_none());
}

#[test]
fn test_apply_keeps_previous_snapshot_when_missing() {
    let mut p = polygon("Block", rings::berlin_block());
    p.time_series_data = Some(temperature_series(&[(0, 30.0)]));

    let resolver = ColorResolver::default();
    let colored = resolver.apply_color_at_time(&p, t0(), &temperature_source());
    assert_eq!(colored.color, Color::hex(RED));
    assert_eq!(colored.weather_data.as_ref().unwrap().temperature, 30.0);

    let grayed = resolver.apply_color_at_time(&colored, t0_plus_hours(12), &temperature_source());
    assert_eq!(grayed.color, Color::fallback());
    assert_eq!(grayed.weather_data, colored.weather_data);
}

#[test]
fn test_snapshot_color_uses_source_variable() {
    let mut p = polygon("Block", rings::unit_square());
    p.time_series_data = Some(temperature_series(&[(0, 30.0)]));
    let snap = color_for_polygon_at_time(&p, t0(), &temperature_source())
        .snapshot
        .unwrap();

    assert_eq!(color_for_snapshot(&snap, &temperature_source()), Color::hex(RED));
}

#[test]
fn test_custom_source_id_has_no_value_at_time() {
    let mut p = polygon("Block", rings::berlin_block());
    p.time_series_data = Some(temperature_series(&[(0, 30.0)]));
    let humidity = DataSource {
        id: "3f2c9a1e-humidity".to_string(),
        name: "Humidity".to_string(),
        field: "relative_humidity_2m".to_string(),
        rules: banded_rules(),
    };

    let res = color_for_polygon_at_time(&p, t0(), &humidity);
    assert_eq!(res.color, Color::fallback());
    assert!(res.snapshot.is_none());

    let applied = ColorResolver::default().apply_color_at_time(&p, t0(), &humidity);
    assert_eq!(applied.color, Color::fallback());
    assert!(applied.weather_data.is_none());
}

#[test]
fn test_custom_source_snapshot_falls_back_to_temperature() {
    let mut p = polygon("Block", rings::berlin_block());
    p.time_series_data = Some(temperature_series(&[(0, 30.0)]));
    let snap = color_for_polygon_at_time(&p, t0(), &temperature_source())
        .snapshot
        .unwrap();
    let custom = DataSource {
        id: "custom".to_string(),
        ..temperature_source()
    };

    assert_eq!(color_for_snapshot(&snap, &custom), Color::hex(RED));
}
