//! Weather providers.
//!
//! [`WeatherProvider`] is the seam between the dashboard and the outside
//! world; [`OpenMeteoClient`] implements it against the public Open-Meteo
//! API, which needs no API key.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashboard_common::{parse_timestamp, LatLng, WeatherSample, WeatherSnapshot};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ClientError, ClientResult};

const HOURLY_FIELDS: &str = "temperature_2m,windspeed_10m";

/// Source of current conditions and hourly samples for a location.
///
/// All timestamps are UTC.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at `at`.
    async fn current_weather(&self, at: LatLng) -> ClientResult<WeatherSnapshot>;

    /// Hourly samples for the inclusive date range.
    async fn historical_series(
        &self,
        at: LatLng,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ClientResult<Vec<WeatherSample>>;

    /// Hourly samples from today for the next `days` days.
    async fn forecast_series(&self, at: LatLng, days: u32) -> ClientResult<Vec<WeatherSample>>;
}

/// Open-Meteo endpoints and HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenMeteoConfig {
    pub forecast_url: String,
    pub archive_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            archive_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            timeout_secs: 30,
        }
    }
}

/// [`WeatherProvider`] backed by the Open-Meteo forecast and archive APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenMeteoConfig {
        &self.config
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> ClientResult<String> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

fn location_query(at: LatLng) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", at.lat.to_string()),
        ("longitude", at.lng.to_string()),
        ("timezone", "GMT".to_string()),
    ]
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = at.lat, lng = at.lng))]
    async fn current_weather(&self, at: LatLng) -> ClientResult<WeatherSnapshot> {
        let mut query = location_query(at);
        query.push(("current_weather", "true".to_string()));

        let body = self.get(&self.config.forecast_url, &query).await?;
        let snapshot = parse_current(&body, at)?;

        debug!(
            temperature = snapshot.temperature,
            wind_speed = snapshot.wind_speed,
            "Current weather fetched"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self), fields(lat = at.lat, lng = at.lng))]
    async fn historical_series(
        &self,
        at: LatLng,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ClientResult<Vec<WeatherSample>> {
        let mut query = location_query(at);
        query.push(("start_date", start_date.format("%Y-%m-%d").to_string()));
        query.push(("end_date", end_date.format("%Y-%m-%d").to_string()));
        query.push(("hourly", HOURLY_FIELDS.to_string()));

        let body = self.get(&self.config.archive_url, &query).await?;
        let samples = parse_hourly(&body)?;

        debug!(points = samples.len(), "Historical series fetched");
        Ok(samples)
    }

    #[instrument(skip(self), fields(lat = at.lat, lng = at.lng))]
    async fn forecast_series(&self, at: LatLng, days: u32) -> ClientResult<Vec<WeatherSample>> {
        let mut query = location_query(at);
        query.push(("hourly", HOURLY_FIELDS.to_string()));
        query.push(("forecast_days", days.to_string()));

        let body = self.get(&self.config.forecast_url, &query).await?;
        let samples = parse_hourly(&body)?;

        debug!(points = samples.len(), "Forecast series fetched");
        Ok(samples)
    }
}

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    #[serde(default)]
    windspeed: Option<f64>,
    time: String,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: Hourly,
}

#[derive(Debug, Deserialize)]
struct Hourly {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
}

/// Parses a `current_weather=true` response. The snapshot's centroid is the
/// queried location.
pub(crate) fn parse_current(body: &str, at: LatLng) -> ClientResult<WeatherSnapshot> {
    let response: CurrentResponse = serde_json::from_str(body)?;
    let current = response.current_weather;

    let timestamp = parse_timestamp(&current.time).map_err(|e| ClientError::Decode(e.to_string()))?;

    Ok(WeatherSnapshot {
        temperature: current.temperature,
        wind_speed: current.windspeed.unwrap_or(0.0),
        timestamp,
        centroid: at,
    })
}

/// Parses an `hourly=` response into samples, one per entry of `time`.
/// Value arrays shorter than `time` yield missing values.
pub(crate) fn parse_hourly(body: &str) -> ClientResult<Vec<WeatherSample>> {
    let response: HourlyResponse = serde_json::from_str(body)?;
    let hourly = response.hourly;

    hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, time)| {
            let timestamp = parse_timestamp(time).map_err(|e| ClientError::Decode(e.to_string()))?;
            Ok(WeatherSample::new(
                timestamp,
                hourly.temperature_2m.get(i).copied().flatten(),
                hourly.windspeed_10m.get(i).copied().flatten(),
            ))
        })
        .collect()
}
