//! Test data generators for creating synthetic weather series.
//!
//! These generators create predictable, verifiable patterns that can be used
//! across the test suite.

use chrono::{DateTime, Duration, Utc};
use dashboard_common::{LatLng, TimeSeries, WeatherSample};

/// Creates an hourly series with a daily temperature cycle.
///
/// Temperature follows `15 + 10 * sin(2π * hour / 24)` and wind speed is
/// `hour % 30`, so any sample can be verified from its offset alone.
///
/// # Arguments
///
/// * `start` - Timestamp of the first sample
/// * `hours` - Number of hourly samples
pub fn create_hourly_series(start: DateTime<Utc>, hours: usize) -> TimeSeries {
    let data = (0..hours)
        .map(|h| {
            let angle = 2.0 * std::f64::consts::PI * (h as f64) / 24.0;
            WeatherSample::new(
                start + Duration::hours(h as i64),
                Some(15.0 + 10.0 * angle.sin()),
                Some((h % 30) as f64),
            )
        })
        .collect();
    TimeSeries::new(data, LatLng::new(0.0, 0.0), start)
}

/// Like [`create_hourly_series`] but every `gap_every`-th sample has no
/// temperature.
pub fn create_series_with_gaps(start: DateTime<Utc>, hours: usize, gap_every: usize) -> TimeSeries {
    let mut series = create_hourly_series(start, hours);
    for (i, sample) in series.data.iter_mut().enumerate() {
        if gap_every > 0 && i % gap_every == 0 {
            sample.temperature = None;
        }
    }
    series
}
