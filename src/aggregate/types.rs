//! Serializable document consumed by the dashboard frontend.
//!
//! Field names are a contract with the dashboard's JavaScript, hence the
//! camelCase renames.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::duration::DurationStats;

/// Month lengths used by the frontend to normalize counts per day.
pub static DAYS_PER_MONTH_2025: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Severity levels in frontend display order.
pub static SEVERITY_LEVELS: [&str; 3] = ["INFO", "WARNING", "SEVERE"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_alerts: usize,
    pub total_alert_months: usize,
    pub top_route: String,
    pub top_cause: String,
}

/// Per-route-type slice of the dashboard, mirroring the global breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTypeBreakdown {
    /// Causes ranked by descending lifetime total.
    pub causes: Vec<String>,
    pub effects: Vec<String>,
    pub cause_totals: BTreeMap<String, u64>,
    pub effect_totals: BTreeMap<String, u64>,
    pub monthly_cause: BTreeMap<String, Vec<u64>>,
    pub monthly_severity: BTreeMap<String, Vec<u64>>,
    pub monthly_effect: BTreeMap<String, Vec<u64>>,
    pub heatmap: Vec<Vec<u64>>,
    pub duration: DurationStats,
}

/// One row of the ranked route table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRow {
    pub id: String,
    #[serde(rename = "type")]
    pub route_type: String,
    pub count: u64,
    pub avg_sev: f64,
    pub top_cause: String,
    pub top_effect: String,
    pub severe: u64,
    pub warning: u64,
    pub info: u64,
    /// Month bucket -> count, zero-filled over the full month range.
    pub months: BTreeMap<String, u64>,
    /// Severity level -> per-month counts aligned to the month list.
    pub monthly_sev: BTreeMap<String, Vec<u64>>,
    pub color: String,
    pub display_name: String,
    pub duration: DurationStats,
}

/// The complete dashboard document, written as one JSON file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub generated: String,
    pub data_range: DataRange,
    pub summary: Summary,
    /// Chronological month buckets; every per-month series aligns to this.
    pub months: Vec<String>,
    pub days_per_month: Vec<u32>,
    /// Causes ranked by descending lifetime total, ties first-seen.
    pub causes: Vec<String>,
    pub effects: Vec<String>,
    pub cause_totals: BTreeMap<String, u64>,
    pub effect_totals: BTreeMap<String, u64>,
    pub monthly_cause: BTreeMap<String, Vec<u64>>,
    pub monthly_severity: BTreeMap<String, Vec<u64>>,
    pub monthly_route_type: BTreeMap<String, Vec<u64>>,
    pub monthly_effect: BTreeMap<String, Vec<u64>>,
    /// 7x24 matrix, rows = weekday (Monday first), columns = hour.
    pub heatmap: Vec<Vec<u64>>,
    pub by_route_type: BTreeMap<String, RouteTypeBreakdown>,
    pub route_table: Vec<RouteRow>,
    pub route_type_names: Vec<String>,
    pub route_shapes: geojson::FeatureCollection,
    pub duration: DurationStats,
}
