//! Fetching weather for polygons.

use chrono::Utc;
use dashboard_common::{Color, DataSource, Polygon};
use futures::stream::{self, StreamExt};
use polygon_color::{centroid, color_for_snapshot, is_time_series_stale, is_weather_stale, FreshnessPolicy};
use tracing::{debug, error, info, instrument};

use crate::provider::WeatherProvider;
use crate::retry::{with_retry, RetryPolicy};
use crate::series::{fetch_complete_series, SeriesWindow};

/// Default number of polygons fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Updates polygons with weather from a [`WeatherProvider`].
///
/// Failures never propagate: a polygon whose fetch fails comes back gray
/// with its cached data cleared, and the error is logged.
pub struct PolygonWeatherService<P> {
    provider: P,
    retry: RetryPolicy,
    window: SeriesWindow,
    freshness: FreshnessPolicy,
    concurrency: usize,
}

impl<P: WeatherProvider> PolygonWeatherService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            window: SeriesWindow::default(),
            freshness: FreshnessPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_window(mut self, window: SeriesWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_freshness(mut self, freshness: FreshnessPolicy) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current conditions at the polygon's centroid, colored by the data
    /// source's rules.
    #[instrument(skip_all, fields(polygon = %polygon.name))]
    pub async fn fetch_polygon_weather(&self, polygon: &Polygon, data_source: &DataSource) -> Polygon {
        let mut updated = polygon.clone();

        let at = match centroid(&polygon.coordinates) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "Cannot locate polygon");
                updated.color = Color::fallback();
                updated.weather_data = None;
                return updated;
            }
        };

        let provider = &self.provider;
        match with_retry(&self.retry, "current_weather", || provider.current_weather(at)).await {
            Ok(snapshot) => {
                updated.color = color_for_snapshot(&snapshot, data_source);
                info!(
                    temperature = snapshot.temperature,
                    wind_speed = snapshot.wind_speed,
                    color = %updated.color,
                    "Weather applied to polygon"
                );
                updated.weather_data = Some(snapshot);
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch weather for polygon");
                updated.color = Color::fallback();
                updated.weather_data = None;
            }
        }

        updated
    }

    /// Past and forecast series at the polygon's centroid.
    #[instrument(skip_all, fields(polygon = %polygon.name))]
    pub async fn fetch_polygon_time_series(&self, polygon: &Polygon) -> Polygon {
        let mut updated = polygon.clone();

        let at = match centroid(&polygon.coordinates) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "Cannot locate polygon");
                updated.time_series_data = None;
                return updated;
            }
        };

        match fetch_complete_series(&self.provider, at, Utc::now(), self.window).await {
            Ok(series) => {
                info!(points = series.len(), "Time series fetched for polygon");
                updated.time_series_data = Some(series);
            }
            Err(e) => {
                metrics::counter!("weather_fetch_failures_total", "operation" => "time_series").increment(1);
                error!(error = %e, "Failed to fetch time series for polygon");
                updated.time_series_data = None;
            }
        }

        updated
    }

    /// Re-fetches the current snapshot when it is stale or `force` is set.
    /// With `include_series`, the time series is re-fetched under the same
    /// rule using the series age limit; each part is checked on its own.
    pub async fn refresh_if_stale(
        &self,
        polygon: &Polygon,
        data_source: &DataSource,
        force: bool,
        include_series: bool,
    ) -> Polygon {
        let now = Utc::now();
        let weather_stale =
            force || is_weather_stale(polygon.weather_data.as_ref(), now, self.freshness.weather_max_age);
        let series_stale = include_series
            && (force
                || is_time_series_stale(polygon.time_series_data.as_ref(), now, self.freshness.series_max_age));

        match (weather_stale, series_stale) {
            (false, false) => {
                debug!(polygon = %polygon.name, "Weather still fresh, skipping refresh");
                polygon.clone()
            }
            (true, false) => self.fetch_polygon_weather(polygon, data_source).await,
            (false, true) => self.fetch_polygon_time_series(polygon).await,
            (true, true) => {
                let (mut weather, series) = futures::join!(
                    self.fetch_polygon_weather(polygon, data_source),
                    self.fetch_polygon_time_series(polygon),
                );
                weather.time_series_data = series.time_series_data;
                weather
            }
        }
    }

    /// Current weather for many polygons, at most `concurrency` in flight.
    /// Output order matches input order.
    pub async fn fetch_many(&self, polygons: &[Polygon], data_source: &DataSource) -> Vec<Polygon> {
        stream::iter(polygons)
            .map(|p| self.fetch_polygon_weather(p, data_source))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// [`Self::refresh_if_stale`] over many polygons with bounded
    /// concurrency; order is preserved.
    pub async fn refresh_many(
        &self,
        polygons: &[Polygon],
        data_source: &DataSource,
        force: bool,
        include_series: bool,
    ) -> Vec<Polygon> {
        stream::iter(polygons)
            .map(|p| self.refresh_if_stale(p, data_source, force, include_series))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
