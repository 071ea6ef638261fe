//! Nearest-sample lookup in a polygon's weather time series.

use chrono::{DateTime, TimeDelta, Utc};
use dashboard_common::{TimeSeries, WeatherVariable};

/// Default distance allowed between the requested time and a sample.
pub const DEFAULT_TOLERANCE_HOURS: i64 = 2;

pub fn default_tolerance() -> TimeDelta {
    TimeDelta::hours(DEFAULT_TOLERANCE_HOURS)
}

/// A value taken from the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledValue {
    pub value: f64,
    /// Timestamp of the sample the value came from.
    pub timestamp: DateTime<Utc>,
    /// Absolute distance between that sample and the requested time.
    pub distance: TimeDelta,
}

/// No usable sample for the requested time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotFound {
    #[error("polygon has no time series")]
    NoSeries,

    #[error("data source {0} has no weather variable")]
    UnknownDataSource(String),

    #[error("no sample carries a {0} value")]
    NoValidSamples(WeatherVariable),

    #[error("closest {variable} sample is {distance_minutes} min away, tolerance is {tolerance_minutes} min")]
    OutOfTolerance {
        variable: WeatherVariable,
        distance_minutes: i64,
        tolerance_minutes: i64,
    },
}

/// Value of `variable` from the sample closest to `target`.
///
/// Samples lacking the variable are skipped, so a farther valid sample wins
/// over a nearer empty one. Ties keep the earlier sample in series order.
/// The tolerance bound is inclusive.
pub fn sample_at(
    series: &TimeSeries,
    target: DateTime<Utc>,
    variable: WeatherVariable,
    tolerance: TimeDelta,
) -> Result<SampledValue, NotFound> {
    let mut best: Option<SampledValue> = None;

    for sample in &series.data {
        let Some(value) = sample.value(variable) else {
            continue;
        };

        let distance = abs_delta(sample.timestamp - target);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(SampledValue {
                value,
                timestamp: sample.timestamp,
                distance,
            });
        }
    }

    let best = best.ok_or(NotFound::NoValidSamples(variable))?;
    if best.distance > tolerance {
        return Err(NotFound::OutOfTolerance {
            variable,
            distance_minutes: best.distance.num_minutes(),
            tolerance_minutes: tolerance.num_minutes(),
        });
    }
    Ok(best)
}

fn abs_delta(d: TimeDelta) -> TimeDelta {
    if d < TimeDelta::zero() {
        -d
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{t0_plus_hours, temperature_series};

    #[test]
    fn test_exact_hit() {
        let series = temperature_series(&[(0, 5.0), (1, 12.0), (3, 26.0)]);
        let s = sample_at(&series, t0_plus_hours(1), WeatherVariable::Temperature, default_tolerance()).unwrap();
        assert_eq!(s.value, 12.0);
        assert_eq!(s.distance, TimeDelta::zero());
    }

    #[test]
    fn test_tie_keeps_earlier_sample() {
        let series = temperature_series(&[(0, 1.0), (2, 2.0)]);
        let s = sample_at(&series, t0_plus_hours(1), WeatherVariable::Temperature, default_tolerance()).unwrap();
        assert_eq!(s.value, 1.0);
    }

    #[test]
    fn test_tolerance_bound_is_inclusive() {
        let series = temperature_series(&[(0, 1.0)]);
        assert!(sample_at(&series, t0_plus_hours(2), WeatherVariable::Temperature, default_tolerance()).is_ok());
    }

    #[test]
    fn test_missing_variable() {
        let series = temperature_series(&[(0, 1.0)]);
        let err = sample_at(&series, t0_plus_hours(0), WeatherVariable::WindSpeed, default_tolerance()).unwrap_err();
        assert_eq!(err, NotFound::NoValidSamples(WeatherVariable::WindSpeed));
    }
}
