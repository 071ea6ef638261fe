//! Time handling for the dashboard timeline.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Parse an ISO 8601 timestamp into UTC.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC, which is
/// how the weather provider reports hourly times) and bare dates.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DashboardError> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    Err(DashboardError::InvalidTime(s.to_string()))
}

/// A closed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }

    /// Whole hours between start and end, rounded down.
    pub fn total_hours(&self) -> i64 {
        time_to_slider(self.end, self.start)
    }

    /// Hourly steps from start to end, both ends inclusive.
    pub fn hours(&self) -> Vec<DateTime<Utc>> {
        timeline_hours(self.start, self.end)
    }
}

/// Hourly timestamps from `start` up to and including `end`.
pub fn timeline_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut hours = Vec::new();
    let mut current = start;
    while current <= end {
        hours.push(current);
        current += Duration::hours(1);
    }
    hours
}

/// Timeline position (hours after `start`) to a timestamp.
pub fn slider_to_time(value: i64, start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::hours(value)
}

/// Timestamp to a timeline position: whole hours after `start`, floored.
pub fn time_to_slider(time: DateTime<Utc>, start: DateTime<Utc>) -> i64 {
    (time - start).num_seconds().div_euclid(3600)
}

/// The scrubbable window: midnight `past_days` ago until the last second of
/// the day `forecast_days` ahead.
pub fn timeline_window(now: DateTime<Utc>, past_days: i64, forecast_days: i64) -> TimeRange {
    let today = now.date_naive();
    let start = Utc.from_utc_datetime(&(today - Duration::days(past_days)).and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(&(today + Duration::days(forecast_days + 1)).and_time(NaiveTime::MIN))
        - Duration::seconds(1);
    TimeRange::new(start, end)
}

/// Default window of 15 days back and 15 days ahead.
pub fn default_timeline_window(now: DateTime<Utc>) -> TimeRange {
    timeline_window(now, 15, 15)
}

/// Whether the timeline selects one instant or an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMode {
    #[default]
    Single,
    Range,
}

/// Timeline selection, persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    pub mode: TimelineMode,
    /// Unset until the first selection.
    #[serde(default)]
    pub selected_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl TimelineState {
    /// Selected instant, or `now` when nothing has been selected yet.
    pub fn effective_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.selected_time.unwrap_or(now)
    }

    /// Selected interval in range mode.
    pub fn range(&self) -> Option<TimeRange> {
        match (self.mode, self.start_time, self.end_time) {
            (TimelineMode::Range, Some(start), Some(end)) => Some(TimeRange::new(start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso8601() {
        let dt = parse_timestamp("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_provider_hourly_format() {
        let dt = parse_timestamp("2024-01-15T07:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_slider_conversions() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t = slider_to_time(30, start);
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap());
        assert_eq!(time_to_slider(t, start), 30);
        assert_eq!(time_to_slider(t + Duration::minutes(59), start), 30);
        assert_eq!(time_to_slider(start - Duration::minutes(1), start), -1);
    }

    #[test]
    fn test_timeline_hours_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let hours = timeline_hours(start, start + Duration::hours(3));
        assert_eq!(hours.len(), 4);
    }

    #[test]
    fn test_default_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 16, 13, 45, 0).unwrap();
        let w = default_timeline_window(now);
        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(w.end, Utc.with_ymd_and_hms(2024, 7, 1, 23, 59, 59).unwrap());
        assert_eq!(w.total_hours(), 31 * 24 - 1);
    }
}
