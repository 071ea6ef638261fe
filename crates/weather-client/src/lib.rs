//! Weather data for dashboard polygons.
//!
//! - [`provider`]: the [`WeatherProvider`] trait and the Open-Meteo client
//! - [`retry`]: exponential backoff around provider calls
//! - [`series`]: archive plus forecast merged into one [`TimeSeries`]
//! - [`service`]: per-polygon fetching with bounded concurrency
//!
//! [`TimeSeries`]: dashboard_common::TimeSeries

pub mod error;
pub mod provider;
pub mod retry;
pub mod series;
pub mod service;

pub use error::{ClientError, ClientResult};
pub use provider::{OpenMeteoClient, OpenMeteoConfig, WeatherProvider};
pub use retry::{with_retry, RetryPolicy};
pub use series::{fetch_complete_series, SeriesWindow};
pub use service::{PolygonWeatherService, DEFAULT_CONCURRENCY};
