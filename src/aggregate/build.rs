//! Assembles the dashboard document from a finished aggregation run.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::Utc;
use geojson::FeatureCollection;

use crate::aggregate::canonical::CanonicalAlerts;
use crate::aggregate::duration::DurationStats;
use crate::aggregate::engine::{CountTable, DedupAggregator, Heatmap};
use crate::aggregate::types::{
    DashboardData, DataRange, RouteRow, RouteTypeBreakdown, Summary, DAYS_PER_MONTH_2025,
    SEVERITY_LEVELS,
};
use crate::labels;

static SEVERITY_WEIGHTS: &[(&str, f64)] = &[("INFO", 1.0), ("WARNING", 2.0), ("SEVERE", 3.0)];

/// Per-category vectors aligned to the month list, zero-filled for months
/// where a category did not occur.
fn build_series(
    monthly: &HashMap<String, CountTable>,
    categories: &[String],
    months: &[String],
) -> BTreeMap<String, Vec<u64>> {
    categories
        .iter()
        .map(|cat| {
            let series = months
                .iter()
                .map(|m| monthly.get(m).map_or(0, |t| t.get(cat)))
                .collect();
            (cat.clone(), series)
        })
        .collect()
}

fn heatmap_rows(hm: &Heatmap) -> Vec<Vec<u64>> {
    hm.iter().map(|row| row.to_vec()).collect()
}

fn totals_map(table: &CountTable) -> BTreeMap<String, u64> {
    table
        .iter_ordered()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Builds the complete dashboard document. Pure assembly: every number
/// comes from the aggregator, the canonical map, or the shape overlay.
pub fn build_dashboard(
    agg: &DedupAggregator,
    canonical: &CanonicalAlerts,
    route_shapes: FeatureCollection,
) -> DashboardData {
    let months: Vec<String> = agg.months.iter().cloned().collect();
    let severity_levels = owned(&SEVERITY_LEVELS);

    let causes = agg.cause_totals.ranked();
    let effects = agg.effect_totals.ranked();
    let route_type_names: Vec<String> = agg.route_type_names.iter().cloned().collect();

    let by_route_type = route_type_names
        .iter()
        .filter_map(|rt_name| {
            let rt = agg.by_route_type.get(rt_name)?;
            let rt_causes = rt.cause_totals.ranked();
            let rt_effects = rt.effect_totals.ranked();
            Some((
                rt_name.clone(),
                RouteTypeBreakdown {
                    monthly_cause: build_series(&rt.monthly_cause, &rt_causes, &months),
                    monthly_severity: build_series(&rt.monthly_severity, &severity_levels, &months),
                    monthly_effect: build_series(&rt.monthly_effect, &rt_effects, &months),
                    cause_totals: totals_map(&rt.cause_totals),
                    effect_totals: totals_map(&rt.effect_totals),
                    causes: rt_causes,
                    effects: rt_effects,
                    heatmap: heatmap_rows(&rt.heatmap),
                    duration: DurationStats::compute(&rt.durations),
                },
            ))
        })
        .collect();

    let route_table: Vec<RouteRow> = agg
        .ranked_routes()
        .into_iter()
        .map(|id| {
            let rs = &agg.routes[&id];
            let weights: HashMap<&str, f64> = SEVERITY_WEIGHTS.iter().copied().collect();
            let weighted: f64 = rs
                .severities
                .iter_ordered()
                .map(|(sev, n)| weights.get(sev).copied().unwrap_or(1.0) * n as f64)
                .sum();
            let avg_sev = weighted / (rs.count.max(1) as f64);

            let month_counts = months.iter().map(|m| (m.clone(), rs.months.get(m))).collect();
            let monthly_sev = ["SEVERE", "WARNING", "INFO"]
                .iter()
                .map(|sev| {
                    let series = months
                        .iter()
                        .map(|m| rs.monthly_severity.get(m).map_or(0, |t| t.get(sev)))
                        .collect();
                    (sev.to_string(), series)
                })
                .collect();

            RouteRow {
                route_type: if rs.route_type.is_empty() {
                    "Unknown".to_string()
                } else {
                    rs.route_type.clone()
                },
                count: rs.count,
                avg_sev: round2(avg_sev),
                top_cause: rs.causes.top().unwrap_or("").to_string(),
                top_effect: rs.effects.top().unwrap_or("").to_string(),
                severe: rs.severities.get("SEVERE"),
                warning: rs.severities.get("WARNING"),
                info: rs.severities.get("INFO"),
                months: month_counts,
                monthly_sev,
                color: labels::route_color(&id).to_string(),
                display_name: labels::route_display_name(&id),
                duration: DurationStats::compute(&rs.durations),
                id,
            }
        })
        .collect();

    DashboardData {
        generated: Utc::now().to_rfc3339(),
        data_range: DataRange {
            from: months.first().cloned().unwrap_or_default(),
            to: months.last().cloned().unwrap_or_default(),
        },
        summary: Summary {
            total_alerts: canonical.distinct_alerts(),
            total_alert_months: agg.alert_month_count(),
            top_route: route_table
                .first()
                .map(|r| r.id.clone())
                .unwrap_or_default(),
            top_cause: causes.first().cloned().unwrap_or_default(),
        },
        days_per_month: DAYS_PER_MONTH_2025.to_vec(),
        monthly_cause: build_series(&agg.monthly_cause, &causes, &months),
        monthly_severity: build_series(&agg.monthly_severity, &severity_levels, &months),
        monthly_route_type: build_series(&agg.monthly_route_type, &route_type_names, &months),
        monthly_effect: build_series(&agg.monthly_effect, &effects, &months),
        cause_totals: totals_map(&agg.cause_totals),
        effect_totals: totals_map(&agg.effect_totals),
        heatmap: heatmap_rows(&agg.heatmap),
        by_route_type,
        route_table,
        route_type_names: labels::ROUTE_TYPE_NAMES
            .iter()
            .map(|(_, name)| name.to_string())
            .collect(),
        route_shapes,
        duration: DurationStats::compute(&agg.durations),
        causes,
        effects,
        months,
    }
}

/// An overlay with no features, used when shape retrieval fails.
pub fn empty_feature_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedRecord;

    fn record(
        alert: &str,
        month: &str,
        cause: &str,
        route: &str,
        severity: &str,
    ) -> NormalizedRecord {
        NormalizedRecord {
            alert_id: alert.to_string(),
            month: month.to_string(),
            weekday: 0,
            hour: 8,
            route_type: "Subway".to_string(),
            cause: cause.to_string(),
            effect: "Delay".to_string(),
            severity: severity.to_string(),
            route_id: route.to_string(),
            start_date: format!("{}-10", month),
            duration_hours: Some(1.5),
        }
    }

    fn build(records: &[NormalizedRecord]) -> DashboardData {
        let mut agg = DedupAggregator::new();
        let mut canonical = CanonicalAlerts::new();
        for (i, rec) in records.iter().enumerate() {
            canonical.observe(&rec.alert_id, &format!("2025-01-01T00:00:{:02}Z", i));
            agg.ingest(rec);
        }
        build_dashboard(&agg, &canonical, empty_feature_collection())
    }

    #[test]
    fn test_cause_ranking_descending_with_first_seen_ties() {
        let data = build(&[
            record("a1", "2025-01", "Maintenance", "Red", "INFO"),
            record("a2", "2025-01", "Weather", "Red", "INFO"),
            record("a3", "2025-01", "Weather", "Red", "INFO"),
            record("a4", "2025-01", "Accident", "Red", "INFO"),
        ]);
        // Weather 2; Maintenance and Accident tie at 1, Maintenance first seen
        assert_eq!(data.causes, vec!["Weather", "Maintenance", "Accident"]);
        assert_eq!(data.summary.top_cause, "Weather");
    }

    #[test]
    fn test_series_align_to_months_with_zero_fill() {
        let data = build(&[
            record("a1", "2025-01", "Weather", "Red", "INFO"),
            record("a2", "2025-03", "Maintenance", "Red", "INFO"),
        ]);
        assert_eq!(data.months, vec!["2025-01", "2025-03"]);
        assert_eq!(data.monthly_cause["Weather"], vec![1, 0]);
        assert_eq!(data.monthly_cause["Maintenance"], vec![0, 1]);
        assert_eq!(data.data_range.from, "2025-01");
        assert_eq!(data.data_range.to, "2025-03");
    }

    #[test]
    fn test_route_table_ranked_and_annotated() {
        let data = build(&[
            record("a1", "2025-01", "Weather", "Red", "SEVERE"),
            record("a2", "2025-01", "Weather", "Blue", "INFO"),
            record("a3", "2025-01", "Weather", "Blue", "WARNING"),
        ]);
        assert_eq!(data.route_table[0].id, "Blue");
        assert_eq!(data.route_table[0].count, 2);
        // (1 + 2) / 2
        assert_eq!(data.route_table[0].avg_sev, 1.5);
        assert_eq!(data.route_table[0].info, 1);
        assert_eq!(data.route_table[0].warning, 1);
        assert_eq!(data.route_table[0].color, "#003DA5");
        assert_eq!(data.route_table[0].display_name, "Blue Line");
        assert_eq!(data.route_table[1].id, "Red");
        assert_eq!(data.summary.top_route, "Blue");
        assert_eq!(data.route_table[0].monthly_sev["WARNING"], vec![1]);
    }

    #[test]
    fn test_summary_counts() {
        let data = build(&[
            record("a1", "2025-01", "Weather", "Red", "INFO"),
            record("a1", "2025-02", "Weather", "Red", "INFO"),
            record("a2", "2025-01", "Weather", "Red", "INFO"),
        ]);
        assert_eq!(data.summary.total_alerts, 2);
        assert_eq!(data.summary.total_alert_months, 3);
    }

    #[test]
    fn test_by_route_type_breakdown_present() {
        let data = build(&[record("a1", "2025-01", "Weather", "Red", "WARNING")]);
        let subway = &data.by_route_type["Subway"];
        assert_eq!(subway.causes, vec!["Weather"]);
        assert_eq!(subway.monthly_severity["WARNING"], vec![1]);
        assert_eq!(subway.heatmap[0][8], 1);
        assert_eq!(subway.duration.count, 1);
        assert_eq!(data.route_type_names, vec!["Green Line", "Subway", "Commuter Rail"]);
    }

    #[test]
    fn test_empty_run_produces_empty_document() {
        let data = build(&[]);
        assert!(data.months.is_empty());
        assert!(data.causes.is_empty());
        assert!(data.route_table.is_empty());
        assert_eq!(data.duration, DurationStats::default());
        assert_eq!(data.heatmap.len(), 7);
        assert_eq!(data.heatmap[0].len(), 24);
        assert_eq!(data.summary.total_alerts, 0);
    }
}
