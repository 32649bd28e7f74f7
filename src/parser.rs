//! CSV reader for the raw alert snapshot export.
//!
//! One row per observed snapshot of an alert; the same alert id recurs
//! across many rows as the alert is updated over time.

use anyhow::Result;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// One raw row from an alerts CSV. Every field arrives as a string; empty
/// strings stand in for missing values. Columns we don't care about are
/// ignored during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlertRow {
    #[serde(default)]
    pub route_type: String,
    pub alert_id: String,
    #[serde(default)]
    pub last_modified_dt: String,
    #[serde(default)]
    pub active_period_start_dt: String,
    #[serde(default)]
    pub active_period_end_dt: String,
    #[serde(default)]
    pub active_period_start_date: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default)]
    pub cause_detail: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub effect_detail: String,
    #[serde(default)]
    pub severity_level: String,
    #[serde(default)]
    pub route_id: String,
}

/// Reads every row from a single alerts CSV file.
pub fn read_alert_rows(path: &Path) -> Result<Vec<RawAlertRow>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawAlertRow = result?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "CSV file read");
    Ok(rows)
}

/// Lists the `.csv` files in a directory in sorted filename order, so a
/// re-run over the same snapshot directory is deterministic.
pub fn list_csv_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
