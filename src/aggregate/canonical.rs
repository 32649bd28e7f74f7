//! Tracks the most recently modified snapshot per alert id.

use std::collections::HashMap;

/// Last-write-wins map of alert id to its greatest `last_modified_dt`.
///
/// ISO-8601 timestamps compare correctly as strings, so no parsing is
/// needed here. The map exists only to answer "how many distinct alerts",
/// independent of how many monthly or daily buckets each alert touches.
#[derive(Debug, Default)]
pub struct CanonicalAlerts {
    latest: HashMap<String, String>,
}

impl CanonicalAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed snapshot, keeping the lexicographically
    /// greatest last-modified timestamp per alert id.
    pub fn observe(&mut self, alert_id: &str, last_modified_dt: &str) {
        match self.latest.get_mut(alert_id) {
            Some(current) => {
                if last_modified_dt > current.as_str() {
                    *current = last_modified_dt.to_string();
                }
            }
            None => {
                self.latest
                    .insert(alert_id.to_string(), last_modified_dt.to_string());
            }
        }
    }

    /// Number of distinct alert ids seen.
    pub fn distinct_alerts(&self) -> usize {
        self.latest.len()
    }
}
