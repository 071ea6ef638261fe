//! Display color of a polygon at a timeline position.

use chrono::{DateTime, TimeDelta, Utc};
use dashboard_common::{Color, DataSource, Polygon, TimeSeries, WeatherSnapshot, WeatherVariable};
use tracing::{debug, warn};

use crate::rules::resolve_color;
use crate::sampler::{default_tolerance, sample_at, NotFound, SampledValue};

/// Color chosen for a polygon plus the weather it was chosen from.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorResolution {
    pub color: Color,
    /// `None` when no sample was usable for the requested time.
    pub snapshot: Option<WeatherSnapshot>,
}

impl ColorResolution {
    fn no_data() -> Self {
        Self {
            color: Color::fallback(),
            snapshot: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Variable a current-conditions snapshot is colored by; unrecognized ids
/// fall back to temperature.
pub fn variable_for(data_source: &DataSource) -> WeatherVariable {
    data_source.variable().unwrap_or_else(|| {
        warn!(data_source = %data_source.id, "Unknown data source, defaulting to temperature");
        WeatherVariable::Temperature
    })
}

/// Resolves polygon colors using a fixed sampling tolerance.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver {
    tolerance: TimeDelta,
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new(default_tolerance())
    }
}

impl ColorResolver {
    pub fn new(tolerance: TimeDelta) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> TimeDelta {
        self.tolerance
    }

    /// Color of `polygon` at `target` under the rules of `data_source`.
    ///
    /// The snapshot carries the sampled value for the data source's
    /// variable, the target time, and the centroid stored with the series.
    /// The other variable is carried over from the polygon's current
    /// snapshot, or 0 when it has none. A data source whose id names no
    /// weather variable yields gray with no snapshot.
    pub fn color_for_polygon_at_time(
        &self,
        polygon: &Polygon,
        target: DateTime<Utc>,
        data_source: &DataSource,
    ) -> ColorResolution {
        let (sampled, variable, series) = match self.sample(polygon, target, data_source) {
            Ok(found) => found,
            Err(reason) => {
                debug!(polygon = %polygon.name, %target, %reason, "No weather value for timeline position");
                return ColorResolution::no_data();
            }
        };

        let color = resolve_color(sampled.value, &data_source.rules);

        let previous = polygon.weather_data.as_ref();
        let carried = |v: WeatherVariable| previous.map(|w| w.value(v)).unwrap_or(0.0);
        let snapshot = match variable {
            WeatherVariable::Temperature => WeatherSnapshot {
                temperature: sampled.value,
                wind_speed: carried(WeatherVariable::WindSpeed),
                timestamp: target,
                centroid: series.centroid,
            },
            WeatherVariable::WindSpeed => WeatherSnapshot {
                temperature: carried(WeatherVariable::Temperature),
                wind_speed: sampled.value,
                timestamp: target,
                centroid: series.centroid,
            },
        };

        ColorResolution {
            color,
            snapshot: Some(snapshot),
        }
    }

    fn sample<'a>(
        &self,
        polygon: &'a Polygon,
        target: DateTime<Utc>,
        data_source: &DataSource,
    ) -> Result<(SampledValue, WeatherVariable, &'a TimeSeries), NotFound> {
        let Some(series) = polygon.time_series_data.as_ref() else {
            return Err(NotFound::NoSeries);
        };
        let Some(variable) = data_source.variable() else {
            warn!(data_source = %data_source.id, "Data source has no weather variable");
            return Err(NotFound::UnknownDataSource(data_source.id.clone()));
        };
        let sampled = sample_at(series, target, variable, self.tolerance)?;
        Ok((sampled, variable, series))
    }

    /// Copy of `polygon` recolored for `target`.
    ///
    /// The snapshot is replaced only when a value was found; otherwise the
    /// polygon keeps its previous snapshot and turns gray.
    pub fn apply_color_at_time(
        &self,
        polygon: &Polygon,
        target: DateTime<Utc>,
        data_source: &DataSource,
    ) -> Polygon {
        let resolution = self.color_for_polygon_at_time(polygon, target, data_source);
        let mut updated = polygon.clone();
        updated.color = resolution.color;
        if let Some(snapshot) = resolution.snapshot {
            updated.weather_data = Some(snapshot);
        }
        updated
    }
}

/// [`ColorResolver::color_for_polygon_at_time`] with the default tolerance.
pub fn color_for_polygon_at_time(
    polygon: &Polygon,
    target: DateTime<Utc>,
    data_source: &DataSource,
) -> ColorResolution {
    ColorResolver::default().color_for_polygon_at_time(polygon, target, data_source)
}

/// Color for a current-conditions snapshot.
pub fn color_for_snapshot(snapshot: &WeatherSnapshot, data_source: &DataSource) -> Color {
    resolve_color(snapshot.value(variable_for(data_source)), &data_source.rules)
}
