//! Staleness of cached polygon weather.

use chrono::{DateTime, TimeDelta, Utc};
use dashboard_common::{Polygon, TimeSeries, WeatherSnapshot};
use serde::{Deserialize, Serialize};

/// Per-polygon fetch lifecycle.
///
/// `Unfetched -> Fetching -> Fresh -> Stale -> Fetching -> Fresh`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchState {
    Unfetched,
    Fetching,
    Fresh,
    Stale,
}

/// Maximum ages before cached data is re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub weather_max_age: TimeDelta,
    pub series_max_age: TimeDelta,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            weather_max_age: TimeDelta::minutes(30),
            series_max_age: TimeDelta::hours(6),
        }
    }
}

/// True when the snapshot is missing or older than `max_age`.
pub fn is_weather_stale(
    snapshot: Option<&WeatherSnapshot>,
    now: DateTime<Utc>,
    max_age: TimeDelta,
) -> bool {
    snapshot.map_or(true, |w| now - w.timestamp > max_age)
}

/// True when the series is missing or was last updated more than `max_age` ago.
pub fn is_time_series_stale(
    series: Option<&TimeSeries>,
    now: DateTime<Utc>,
    max_age: TimeDelta,
) -> bool {
    series.map_or(true, |s| now - s.last_updated > max_age)
}

/// Where a polygon is in its fetch lifecycle.
///
/// `in_flight` comes from whoever issues the fetches; this crate does not
/// track requests.
pub fn fetch_state(
    polygon: &Polygon,
    in_flight: bool,
    now: DateTime<Utc>,
    policy: &FreshnessPolicy,
) -> FetchState {
    if in_flight {
        return FetchState::Fetching;
    }
    if polygon.weather_data.is_none() && polygon.time_series_data.is_none() {
        return FetchState::Unfetched;
    }

    let weather_stale = is_weather_stale(polygon.weather_data.as_ref(), now, policy.weather_max_age);
    let series_stale =
        is_time_series_stale(polygon.time_series_data.as_ref(), now, policy.series_max_age);

    if weather_stale || series_stale {
        FetchState::Stale
    } else {
        FetchState::Fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_common::LatLng;
    use test_utils::{polygon, rings, t0, t0_plus_hours, temperature_series};

    fn snapshot_at(ts: DateTime<Utc>) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 10.0,
            wind_speed: 3.0,
            timestamp: ts,
            centroid: LatLng::new(0.0, 0.0),
        }
    }

    #[test]
    fn test_weather_staleness_threshold() {
        let snap = snapshot_at(t0());
        let max = TimeDelta::minutes(30);
        assert!(!is_weather_stale(Some(&snap), t0() + TimeDelta::minutes(30), max));
        assert!(is_weather_stale(Some(&snap), t0() + TimeDelta::minutes(31), max));
        assert!(is_weather_stale(None, t0(), max));
    }

    #[test]
    fn test_series_staleness_threshold() {
        let series = temperature_series(&[(0, 1.0)]);
        let max = TimeDelta::hours(6);
        assert!(!is_time_series_stale(Some(&series), t0_plus_hours(6), max));
        assert!(is_time_series_stale(Some(&series), t0_plus_hours(7), max));
    }

    #[test]
    fn test_lifecycle() {
        let policy = FreshnessPolicy::default();
        let mut p = polygon("A", rings::unit_square());
        assert_eq!(fetch_state(&p, false, t0(), &policy), FetchState::Unfetched);
        assert_eq!(fetch_state(&p, true, t0(), &policy), FetchState::Fetching);

        p.weather_data = Some(snapshot_at(t0()));
        p.time_series_data = Some(temperature_series(&[(0, 1.0)]));
        assert_eq!(fetch_state(&p, false, t0(), &policy), FetchState::Fresh);
        assert_eq!(fetch_state(&p, false, t0_plus_hours(1), &policy), FetchState::Stale);
    }
}
