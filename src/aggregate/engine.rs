//! The deduplicating aggregation engine.
//!
//! The source data is a series of periodic snapshots rather than a change
//! log, so the same alert id recurs across many raw rows within the same
//! month and the same calendar day. Each counter family therefore has its
//! own seen-set; a record increments a family's counters at most once per
//! dedup key, no matter how many snapshots produced it. "Counted once per
//! month globally" and "counted once per month per route" are different
//! statements that must both hold, which is why the scopes are independent.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::normalize::NormalizedRecord;

/// A 7x24 incident matrix: rows are weekdays (Monday = 0), columns hours.
pub type Heatmap = [[u64; 24]; 7];

/// Counter map that remembers first-seen insertion order, so rank
/// tie-breaks are deterministic over the input stream.
#[derive(Debug, Default, Clone)]
pub struct CountTable {
    counts: HashMap<String, u64>,
    order: Vec<String>,
}

impl CountTable {
    pub fn bump(&mut self, key: &str) {
        match self.counts.get_mut(key) {
            Some(c) => *c += 1,
            None => {
                self.counts.insert(key.to_string(), 1);
                self.order.push(key.to_string());
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Keys ordered by descending count; ties keep first-seen order
    /// (the sort is stable over the insertion sequence).
    pub fn ranked(&self) -> Vec<String> {
        let mut keys = self.order.clone();
        keys.sort_by_key(|k| std::cmp::Reverse(self.counts[k]));
        keys
    }

    /// The single highest-count key, earliest-seen on ties.
    pub fn top(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for key in &self.order {
            let count = self.counts[key];
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((key, count));
            }
        }
        best.map(|(k, _)| k)
    }

    /// Entries in first-seen order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (&str, u64)> {
        self.order.iter().map(|k| (k.as_str(), self.counts[k]))
    }
}

/// Monthly counter family for one route type label.
#[derive(Debug, Default)]
pub struct RouteTypeAccum {
    pub monthly_cause: HashMap<String, CountTable>,
    pub monthly_severity: HashMap<String, CountTable>,
    pub monthly_effect: HashMap<String, CountTable>,
    pub cause_totals: CountTable,
    pub effect_totals: CountTable,
    pub heatmap: Heatmap,
    pub durations: Vec<f64>,
}

/// Incrementally-built rollup for one route id.
#[derive(Debug, Default)]
pub struct RouteRollup {
    pub count: u64,
    pub causes: CountTable,
    pub effects: CountTable,
    pub severities: CountTable,
    /// Last-write-wins label; overwritten whenever a record supplies one.
    pub route_type: String,
    /// Month bucket -> incident count.
    pub months: CountTable,
    /// Month bucket -> severity -> count.
    pub monthly_severity: HashMap<String, CountTable>,
    pub durations: Vec<f64>,
}

/// Owns every counter table for one batch run. Constructed fresh per run
/// and discarded after the dashboard document is built.
#[derive(Debug, Default)]
pub struct DedupAggregator {
    seen_global: HashSet<(String, String)>,
    seen_per_route_type: HashSet<(String, String, String)>,
    seen_heatmap: HashSet<(String, String)>,
    seen_heatmap_route_type: HashSet<(String, String, String)>,
    seen_route: HashSet<(String, String, String)>,

    pub months: BTreeSet<String>,
    pub route_type_names: BTreeSet<String>,

    pub monthly_cause: HashMap<String, CountTable>,
    pub monthly_severity: HashMap<String, CountTable>,
    pub monthly_route_type: HashMap<String, CountTable>,
    pub monthly_effect: HashMap<String, CountTable>,
    pub cause_totals: CountTable,
    pub effect_totals: CountTable,
    pub severity_totals: CountTable,
    pub heatmap: Heatmap,
    pub durations: Vec<f64>,

    pub by_route_type: HashMap<String, RouteTypeAccum>,
    pub routes: HashMap<String, RouteRollup>,
    route_order: Vec<String>,
}

impl DedupAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one normalized record into every counter family whose dedup
    /// key has not been seen yet.
    pub fn ingest(&mut self, rec: &NormalizedRecord) {
        self.months.insert(rec.month.clone());
        self.route_type_names.insert(rec.route_type.clone());

        let capped = rec.capped_duration();

        let global_key = (rec.alert_id.clone(), rec.month.clone());
        if self.seen_global.insert(global_key) {
            self.monthly_cause
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.cause);
            self.monthly_severity
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.severity);
            self.monthly_route_type
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.route_type);
            self.monthly_effect
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.effect);
            self.cause_totals.bump(&rec.cause);
            self.effect_totals.bump(&rec.effect);
            self.severity_totals.bump(&rec.severity);
            if let Some(d) = capped {
                self.durations.push(d);
            }
        }

        let rt_key = (
            rec.alert_id.clone(),
            rec.month.clone(),
            rec.route_type.clone(),
        );
        if self.seen_per_route_type.insert(rt_key) {
            let rt = self.by_route_type.entry(rec.route_type.clone()).or_default();
            rt.monthly_cause
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.cause);
            rt.monthly_severity
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.severity);
            rt.monthly_effect
                .entry(rec.month.clone())
                .or_default()
                .bump(&rec.effect);
            rt.cause_totals.bump(&rec.cause);
            rt.effect_totals.bump(&rec.effect);
            if let Some(d) = capped {
                rt.durations.push(d);
            }
        }

        if !rec.start_date.is_empty() {
            let hm_key = (rec.alert_id.clone(), rec.start_date.clone());
            if self.seen_heatmap.insert(hm_key) {
                self.heatmap[rec.weekday as usize][rec.hour as usize] += 1;
            }
            let hm_rt_key = (
                rec.alert_id.clone(),
                rec.start_date.clone(),
                rec.route_type.clone(),
            );
            if self.seen_heatmap_route_type.insert(hm_rt_key) {
                let rt = self.by_route_type.entry(rec.route_type.clone()).or_default();
                rt.heatmap[rec.weekday as usize][rec.hour as usize] += 1;
            }
        }

        if !rec.route_id.is_empty() {
            let route_key = (
                rec.alert_id.clone(),
                rec.month.clone(),
                rec.route_id.clone(),
            );
            if self.seen_route.insert(route_key) {
                if !self.routes.contains_key(&rec.route_id) {
                    self.route_order.push(rec.route_id.clone());
                }
                let rs = self.routes.entry(rec.route_id.clone()).or_default();
                rs.count += 1;
                rs.causes.bump(&rec.cause);
                rs.effects.bump(&rec.effect);
                rs.severities.bump(&rec.severity);
                rs.months.bump(&rec.month);
                rs.monthly_severity
                    .entry(rec.month.clone())
                    .or_default()
                    .bump(&rec.severity);
                if !rec.route_type.is_empty() {
                    rs.route_type = rec.route_type.clone();
                }
                if let Some(d) = capped {
                    rs.durations.push(d);
                }
            }
        }
    }

    /// Distinct `(alert, month)` pairs counted in the global scope.
    pub fn alert_month_count(&self) -> usize {
        self.seen_global.len()
    }

    /// Route ids ordered by descending rollup count, first-seen on ties.
    pub fn ranked_routes(&self) -> Vec<String> {
        let mut ids = self.route_order.clone();
        ids.sort_by_key(|id| std::cmp::Reverse(self.routes[id].count));
        ids
    }
}
