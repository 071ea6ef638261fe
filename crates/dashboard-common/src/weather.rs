//! Weather samples, snapshots and time series attached to polygons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::LatLng;
use crate::rule::WeatherVariable;
use crate::time::TimeRange;

/// One hourly observation or forecast value from the weather provider.
///
/// Either variable may be missing; the provider reports gaps as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
}

impl WeatherSample {
    pub fn new(timestamp: DateTime<Utc>, temperature: Option<f64>, wind_speed: Option<f64>) -> Self {
        Self {
            timestamp,
            temperature,
            wind_speed,
        }
    }

    /// Value of the requested variable, if present and finite.
    pub fn value(&self, variable: WeatherVariable) -> Option<f64> {
        let v = match variable {
            WeatherVariable::Temperature => self.temperature,
            WeatherVariable::WindSpeed => self.wind_speed,
        };
        v.filter(|v| v.is_finite())
    }
}

/// Weather attached to a polygon for display: either the provider's current
/// conditions or a value sampled from the time series at a timeline position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub wind_speed: f64,
    pub timestamp: DateTime<Utc>,
    /// Centroid the data was fetched for.
    pub centroid: LatLng,
}

impl WeatherSnapshot {
    pub fn value(&self, variable: WeatherVariable) -> f64 {
        match variable {
            WeatherVariable::Temperature => self.temperature,
            WeatherVariable::WindSpeed => self.wind_speed,
        }
    }
}

/// Hourly samples spanning the past and forecast windows for one centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    /// Samples sorted ascending by timestamp.
    pub data: Vec<WeatherSample>,
    pub last_updated: DateTime<Utc>,
    pub centroid: LatLng,
}

impl TimeSeries {
    /// Builds a series, sorting the samples by timestamp.
    pub fn new(mut data: Vec<WeatherSample>, centroid: LatLng, last_updated: DateTime<Utc>) -> Self {
        data.sort_by_key(|s| s.timestamp);
        Self {
            data,
            last_updated,
            centroid,
        }
    }

    /// Combines several sample runs (e.g. archive and forecast) into one
    /// ascending series.
    ///
    /// Samples sharing a timestamp are coalesced field by field; the first
    /// non-null value in argument order wins.
    pub fn merge(
        parts: Vec<Vec<WeatherSample>>,
        centroid: LatLng,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let mut all: Vec<WeatherSample> = parts.into_iter().flatten().collect();
        // stable: keeps argument order among equal timestamps
        all.sort_by_key(|s| s.timestamp);

        let mut data: Vec<WeatherSample> = Vec::with_capacity(all.len());
        for sample in all {
            match data.last_mut() {
                Some(prev) if prev.timestamp == sample.timestamp => {
                    prev.temperature = prev.temperature.or(sample.temperature);
                    prev.wind_speed = prev.wind_speed.or(sample.wind_speed);
                }
                _ => data.push(sample),
            }
        }

        Self {
            data,
            last_updated,
            centroid,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First and last sample times.
    pub fn span(&self) -> Option<TimeRange> {
        match (self.data.first(), self.data.last()) {
            (Some(first), Some(last)) => Some(TimeRange::new(first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}
