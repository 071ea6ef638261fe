//! Complete past-plus-forecast time series for one location.

use chrono::{DateTime, Days, Utc};
use dashboard_common::{LatLng, TimeSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ClientResult;
use crate::provider::WeatherProvider;

/// Days of archive and forecast data fetched around today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesWindow {
    pub past_days: u32,
    pub forecast_days: u32,
}

impl Default for SeriesWindow {
    fn default() -> Self {
        Self {
            past_days: 15,
            forecast_days: 15,
        }
    }
}

/// Fetches the archive (today minus `past_days` through today) and the
/// forecast concurrently and merges them into one ascending series stamped
/// with `now`.
#[instrument(skip(provider), fields(lat = at.lat, lng = at.lng))]
pub async fn fetch_complete_series<P>(
    provider: &P,
    at: LatLng,
    now: DateTime<Utc>,
    window: SeriesWindow,
) -> ClientResult<TimeSeries>
where
    P: WeatherProvider + ?Sized,
{
    let end_date = now.date_naive();
    let start_date = end_date
        .checked_sub_days(Days::new(u64::from(window.past_days)))
        .unwrap_or(end_date);

    let (historical, forecast) = futures::try_join!(
        provider.historical_series(at, start_date, end_date),
        provider.forecast_series(at, window.forecast_days),
    )?;

    debug!(
        historical = historical.len(),
        forecast = forecast.len(),
        "Merging weather series"
    );

    Ok(TimeSeries::merge(vec![historical, forecast], at, now))
}
