//! Configuration loading.
//!
//! Every field has a default, so the YAML file is optional and may set any
//! subset of keys.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use polygon_color::{FreshnessPolicy, DEFAULT_TOLERANCE_HOURS};
use serde::Deserialize;
use tracing::debug;
use weather_client::{OpenMeteoConfig, RetryPolicy, SeriesWindow, DEFAULT_CONCURRENCY};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub provider: OpenMeteoConfig,
    pub retry: RetryPolicy,
    /// Days of data fetched around today; also bounds the timeline.
    pub window: SeriesWindow,
    pub sampling: SamplingConfig,
    pub freshness: FreshnessConfig,
    /// Polygons fetched at once.
    pub concurrency: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            provider: OpenMeteoConfig::default(),
            retry: RetryPolicy::default(),
            window: SeriesWindow::default(),
            sampling: SamplingConfig::default(),
            freshness: FreshnessConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub tolerance_minutes: i64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            tolerance_minutes: DEFAULT_TOLERANCE_HOURS * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    pub weather_max_age_minutes: i64,
    pub series_max_age_hours: i64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            weather_max_age_minutes: 30,
            series_max_age_hours: 6,
        }
    }
}

impl DashboardConfig {
    /// Loads the YAML file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: DashboardConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded dashboard config");
        Ok(config)
    }

    pub fn tolerance(&self) -> TimeDelta {
        TimeDelta::minutes(self.sampling.tolerance_minutes)
    }

    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy {
            weather_max_age: TimeDelta::minutes(self.freshness.weather_max_age_minutes),
            series_max_age: TimeDelta::hours(self.freshness.series_max_age_hours),
        }
    }
}
