//! Turns raw alert snapshot rows into typed, rail-filtered records.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::labels;
use crate::parser::RawAlertRow;

/// Durations at or above this are treated as data artifacts (open-ended
/// alerts), not real outage spans, and excluded from duration samples.
pub const DURATION_CAP_HOURS: f64 = 720.0;

/// One normalized observation of a rail alert, derived from a raw row.
/// Immutable once built; the aggregation engine consumes these by the
/// thousands and dedups them per scope.
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub alert_id: String,
    /// Month bucket, `YYYY-MM`.
    pub month: String,
    /// Weekday of the active period start, Monday = 0.
    pub weekday: u32,
    /// Hour of the active period start, 0-23.
    pub hour: u32,
    /// Route type display label ("Green Line" / "Subway" / "Commuter Rail").
    pub route_type: String,
    pub cause: String,
    pub effect: String,
    /// INFO / WARNING / SEVERE.
    pub severity: String,
    /// May be empty when the alert is not tied to a single route.
    pub route_id: String,
    /// Calendar date of the active period start, may be empty.
    pub start_date: String,
    /// Present only when both period endpoints parse and end > start.
    pub duration_hours: Option<f64>,
}

impl NormalizedRecord {
    /// Duration sample for statistics, with the artifact cap applied.
    /// The underlying event still counts everywhere else.
    pub fn capped_duration(&self) -> Option<f64> {
        self.duration_hours.filter(|d| *d < DURATION_CAP_HOURS)
    }
}

/// Parses an ISO-8601 timestamp with an optional trailing `Z` or offset.
/// Timestamps without an offset are taken as UTC.
pub fn parse_dt(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Normalizes one raw row, or returns `None` when the row is filtered out.
///
/// A row is dropped when its route type is not one of the rail codes, or
/// when its active period start timestamp is missing or unparsable. Dropped
/// rows contribute to nothing downstream, including the distinct-alert map.
pub fn normalize(row: &RawAlertRow) -> Option<NormalizedRecord> {
    let route_type = labels::route_type_name(&row.route_type)?;

    let start = parse_dt(&row.active_period_start_dt)?;
    let end = parse_dt(&row.active_period_end_dt);

    // Never zero or negative; absent unless end strictly follows start.
    let duration_hours = end
        .filter(|e| *e > start)
        .map(|e| (e - start).num_seconds() as f64 / 3600.0);

    let severity = if row.severity_level.is_empty() {
        "INFO".to_string()
    } else {
        row.severity_level.clone()
    };

    Some(NormalizedRecord {
        alert_id: row.alert_id.clone(),
        month: start.format("%Y-%m").to_string(),
        weekday: start.weekday().num_days_from_monday(),
        hour: start.hour(),
        route_type: route_type.to_string(),
        cause: labels::display_cause(&row.cause, &row.cause_detail),
        effect: labels::display_effect(&row.effect, &row.effect_detail),
        severity,
        route_id: row.route_id.clone(),
        start_date: row.active_period_start_date.clone(),
        duration_hours,
    })
}
