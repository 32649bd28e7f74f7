//! Serialization of the finished dashboard document.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::aggregate::types::DashboardData;

/// Serializes any value to compact JSON and writes it to `path`.
pub fn write_json_file(path: &str, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec(value)?;
    std::fs::write(path, &body)?;

    let size_mb = body.len() as f64 / 1024.0 / 1024.0;
    info!(path, size_mb = format!("{size_mb:.2}").as_str(), "Wrote JSON output");
    Ok(())
}

/// Info-logs the headline numbers of a finished run.
pub fn log_summary(data: &DashboardData) {
    info!(
        months = data.months.len(),
        routes = data.route_table.len(),
        route_types = ?data.by_route_type.keys().collect::<Vec<_>>(),
        map_shapes = data.route_shapes.features.len(),
        total_alerts = data.summary.total_alerts,
        "Dashboard data built"
    );
}
