//! Alert aggregation: deduplication, counters, and dashboard assembly.
//!
//! This module collapses repeated snapshots of the same alert into single
//! countable events per aggregation dimension, builds the monthly /
//! heatmap / per-route counter families, and assembles the dashboard
//! document from them.

pub mod build;
pub mod canonical;
pub mod duration;
pub mod engine;
pub mod types;

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::normalize::normalize;
use crate::parser::{list_csv_files, read_alert_rows};
use canonical::CanonicalAlerts;
use engine::DedupAggregator;

/// Runs one aggregation pass over every alerts CSV in a directory.
///
/// Returns the loaded engine, the canonical alert map, and the number of
/// rows dropped by the rail filter or for an unusable start timestamp.
pub fn aggregate_dir(dir: &Path) -> Result<(DedupAggregator, CanonicalAlerts, u64)> {
    let mut agg = DedupAggregator::new();
    let mut canonical = CanonicalAlerts::new();
    let mut skipped = 0u64;

    for file in list_csv_files(dir)? {
        info!(file = %file.display(), "Processing alerts file");
        for row in read_alert_rows(&file)? {
            match normalize(&row) {
                Some(rec) => {
                    canonical.observe(&row.alert_id, &row.last_modified_dt);
                    agg.ingest(&rec);
                }
                None => skipped += 1,
            }
        }
    }

    debug!(
        distinct_alerts = canonical.distinct_alerts(),
        alert_months = agg.alert_month_count(),
        skipped,
        "Aggregation pass finished"
    );
    Ok((agg, canonical, skipped))
}
