//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use dashboard_common::{
    close_ring, slider_to_time, time_to_slider, timeline_window, validate_vertices, Color,
    DashboardError, LatLng, NewPolygon, Polygon, TimeRange, TimelineMode, WeatherVariable,
};
use dashboard_state::{DashboardState, DashboardStore};
use polygon_color::{format_value, temperature_label, variable_for, ColorResolver};
use tracing::{info, warn};
use weather_client::{OpenMeteoClient, PolygonWeatherService};

use crate::config::DashboardConfig;

/// Fetches weather for every polygon whose data is stale (or all of them
/// with `force`), one data source at a time.
pub async fn refresh(
    store: &mut DashboardStore,
    config: &DashboardConfig,
    force: bool,
    include_series: bool,
) -> Result<()> {
    let client = OpenMeteoClient::new(config.provider.clone()).context("Failed to create weather client")?;
    let service = PolygonWeatherService::new(client)
        .with_retry_policy(config.retry)
        .with_window(config.window)
        .with_freshness(config.freshness_policy())
        .with_concurrency(config.concurrency);

    let data_sources = store.state().data_sources.clone();
    let mut refreshed = 0;

    for data_source in &data_sources {
        let polygons: Vec<Polygon> = store
            .state()
            .polygons
            .iter()
            .filter(|p| p.data_source == data_source.id)
            .cloned()
            .collect();
        if polygons.is_empty() {
            continue;
        }

        info!(data_source = %data_source.id, count = polygons.len(), "Refreshing polygons");
        for updated in service.refresh_many(&polygons, data_source, force, include_series).await {
            store.replace_polygon(updated)?;
            refreshed += 1;
        }
    }

    let orphaned = store.state().polygons.len().saturating_sub(refreshed);
    if orphaned > 0 {
        warn!(count = orphaned, "Polygons with an unknown data source were not refreshed");
    }

    print_colors(store.state(), None);
    Ok(())
}

/// Recolors every polygon for `at` (default: the timeline selection, or now)
/// from its cached time series.
pub fn colors(store: &mut DashboardStore, config: &DashboardConfig, at: Option<DateTime<Utc>>) -> Result<()> {
    let target = at.unwrap_or_else(|| store.state().timeline.effective_time(Utc::now()));
    let resolver = ColorResolver::new(config.tolerance());

    let count = store.recolor_at(target, &resolver);
    info!(count, %target, "Polygons recolored");

    print_colors(store.state(), Some(target));
    Ok(())
}

/// Adds a polygon from 3 to 12 points given in drawing order.
pub fn add_polygon(store: &mut DashboardStore, name: String, points: Vec<LatLng>, data_source: &str) -> Result<Polygon> {
    if store.state().data_source(data_source).is_none() {
        return Err(DashboardError::DataSourceNotFound(data_source.to_string()).into());
    }
    validate_vertices(&points)?;

    let polygon = store.add_polygon(NewPolygon {
        name,
        coordinates: close_ring(points),
        data_source: data_source.to_string(),
        color: Color::fallback(),
    })?;

    println!("{}  {}  ({} points)", polygon.id, polygon.name, polygon.vertex_count());
    Ok(polygon)
}

/// Timeline changes requested on the command line.
#[derive(Debug, Default)]
pub struct TimelineChange {
    pub mode: Option<TimelineMode>,
    pub select: Option<DateTime<Utc>>,
    pub hour: Option<i64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Applies `change` and prints the timeline. Selections snap down to the
/// whole hour and must fall inside the window.
pub fn timeline(store: &mut DashboardStore, config: &DashboardConfig, change: TimelineChange, now: DateTime<Utc>) -> Result<()> {
    let window = timeline_window(now, i64::from(config.window.past_days), i64::from(config.window.forecast_days));

    if let Some(mode) = change.mode {
        store.set_timeline_mode(mode);
    }

    let selected = match (change.hour, change.select) {
        (Some(_), Some(_)) => bail!("--hour and --select are mutually exclusive"),
        (Some(hour), None) => {
            if !(0..=window.total_hours()).contains(&hour) {
                bail!("hour {} is outside the timeline (0 to {})", hour, window.total_hours());
            }
            Some(slider_to_time(hour, window.start))
        }
        (None, Some(time)) => Some(snap_to_hour(time, &window)),
        (None, None) => None,
    };
    if let Some(time) = selected {
        ensure_in_window(time, &window)?;
        store.set_selected_time(time);
    }

    match (change.start, change.end) {
        (Some(start), Some(end)) => {
            let (start, end) = (snap_to_hour(start, &window), snap_to_hour(end, &window));
            ensure_in_window(start, &window)?;
            ensure_in_window(end, &window)?;
            store.set_time_range(start, end)?;
        }
        (None, None) => {}
        _ => bail!("--start and --end must be given together"),
    }

    print_timeline(store.state(), &window, now);
    Ok(())
}

fn snap_to_hour(time: DateTime<Utc>, window: &TimeRange) -> DateTime<Utc> {
    slider_to_time(time_to_slider(time, window.start), window.start)
}

fn ensure_in_window(time: DateTime<Utc>, window: &TimeRange) -> Result<()> {
    if !window.contains(&time) {
        bail!("{} is outside the timeline ({} to {})", time, window.start, window.end);
    }
    Ok(())
}

fn print_timeline(state: &DashboardState, window: &TimeRange, now: DateTime<Utc>) {
    let timeline = &state.timeline;
    let selected = timeline.effective_time(now);

    println!("window:   {} .. {} ({} hours)", window.start, window.end, window.total_hours() + 1);
    println!("mode:     {:?}", timeline.mode);
    println!(
        "selected: {} (hour {}){}",
        selected,
        time_to_slider(selected, window.start),
        if timeline.selected_time.is_none() { " [now]" } else { "" }
    );
    if let Some(range) = timeline.range() {
        println!("range:    {} .. {} ({} hours)", range.start, range.end, range.total_hours());
    }
}

fn print_colors(state: &DashboardState, at: Option<DateTime<Utc>>) {
    if let Some(at) = at {
        println!("colors at {}", at);
    }
    if state.polygons.is_empty() {
        println!("no polygons");
        return;
    }

    for polygon in &state.polygons {
        let variable = state.data_source(&polygon.data_source).map(variable_for);
        let reading = match (&polygon.weather_data, variable) {
            (Some(weather), Some(variable)) => {
                let value = weather.value(variable);
                match variable {
                    WeatherVariable::Temperature => {
                        format!("{} ({})", format_value(value, variable), temperature_label(value))
                    }
                    WeatherVariable::WindSpeed => format_value(value, variable),
                }
            }
            _ => "no data".to_string(),
        };

        println!(
            "{:<24} {:<12} {:<10} {}",
            polygon.name,
            polygon.data_source,
            polygon.color.to_hex(),
            reading
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 16, 9, 41, 0).unwrap()
    }

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(52.52, 13.40),
            LatLng::new(52.52, 13.42),
            LatLng::new(52.53, 13.42),
            LatLng::new(52.53, 13.40),
        ]
    }

    #[test]
    fn test_add_polygon_closes_ring() {
        let mut store = DashboardStore::new();
        let polygon = add_polygon(&mut store, "Mitte".to_string(), square(), "temperature").unwrap();
        assert_eq!(polygon.coordinates.len(), 5);
        assert_eq!(store.state().polygons.len(), 1);
    }

    #[test]
    fn test_add_polygon_unknown_data_source() {
        let mut store = DashboardStore::new();
        assert!(add_polygon(&mut store, "A".to_string(), square(), "humidity").is_err());
    }

    #[test]
    fn test_add_polygon_too_few_points() {
        let mut store = DashboardStore::new();
        let points = square().into_iter().take(2).collect();
        assert!(add_polygon(&mut store, "A".to_string(), points, "temperature").is_err());
    }

    #[test]
    fn test_timeline_select_snaps_to_hour() {
        let mut store = DashboardStore::new();
        let change = TimelineChange {
            select: Some(Utc.with_ymd_and_hms(2024, 7, 18, 14, 59, 59).unwrap()),
            ..Default::default()
        };
        timeline(&mut store, &DashboardConfig::default(), change, now()).unwrap();
        assert_eq!(
            store.state().timeline.selected_time,
            Some(Utc.with_ymd_and_hms(2024, 7, 18, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_timeline_hour_position() {
        let mut store = DashboardStore::new();
        let change = TimelineChange {
            hour: Some(24),
            ..Default::default()
        };
        timeline(&mut store, &DashboardConfig::default(), change, now()).unwrap();
        // window starts at midnight 15 days back
        assert_eq!(
            store.state().timeline.selected_time,
            Some(Utc.with_ymd_and_hms(2024, 7, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_timeline_rejects_out_of_window() {
        let mut store = DashboardStore::new();
        let change = TimelineChange {
            select: Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(timeline(&mut store, &DashboardConfig::default(), change, now()).is_err());
        assert!(store.state().timeline.selected_time.is_none());
    }

    #[test]
    fn test_timeline_rejects_hour_outside_window() {
        let mut store = DashboardStore::new();
        for hour in [-1, 31 * 24, 1_000_000_000_000, i64::MAX] {
            let change = TimelineChange {
                hour: Some(hour),
                ..Default::default()
            };
            assert!(timeline(&mut store, &DashboardConfig::default(), change, now()).is_err());
        }
        assert!(store.state().timeline.selected_time.is_none());
    }

    #[test]
    fn test_timeline_last_hour_is_accepted() {
        let mut store = DashboardStore::new();
        let change = TimelineChange {
            hour: Some(31 * 24 - 1),
            ..Default::default()
        };
        timeline(&mut store, &DashboardConfig::default(), change, now()).unwrap();
        assert_eq!(
            store.state().timeline.selected_time,
            Some(Utc.with_ymd_and_hms(2024, 7, 31, 23, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_timeline_range() {
        let mut store = DashboardStore::new();
        let change = TimelineChange {
            mode: Some(TimelineMode::Range),
            start: Some(Utc.with_ymd_and_hms(2024, 7, 10, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2024, 7, 20, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        timeline(&mut store, &DashboardConfig::default(), change, now()).unwrap();
        let range = store.state().timeline.range().unwrap();
        assert_eq!(range.total_hours(), 240);
    }

    #[test]
    fn test_colors_without_series_is_gray() {
        let mut store = DashboardStore::new();
        add_polygon(&mut store, "A".to_string(), square(), "temperature").unwrap();
        colors(&mut store, &DashboardConfig::default(), Some(now())).unwrap();
        assert_eq!(store.state().polygons[0].color, Color::fallback());
    }
}
