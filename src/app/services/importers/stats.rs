//! Import statistics
//!
//! Counters collected while one datasource is mapped onto the store,
//! reported in the CLI summary and the import log line.

use crate::constants::MAX_RECORDED_SKIPS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics for a single datasource import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub datasource_id: String,

    /// Features, rows or archive rows read from the source file
    pub records_read: usize,

    pub subjects_saved: usize,

    pub timed_values_saved: usize,

    pub fixed_values_saved: usize,

    /// Records that produced no facts
    pub records_skipped: usize,

    /// First few skip reasons, for debugging
    pub skip_reasons: Vec<String>,

    #[serde(skip)]
    pub elapsed: Duration,
}

impl ImportStats {
    pub fn new(datasource_id: impl Into<String>) -> Self {
        Self {
            datasource_id: datasource_id.into(),
            ..Self::default()
        }
    }

    /// Count a skipped record, keeping its reason while the list has room
    pub fn skip(&mut self, reason: impl Into<String>) {
        self.records_skipped += 1;
        if self.skip_reasons.len() < MAX_RECORDED_SKIPS {
            self.skip_reasons.push(reason.into());
        }
    }

    /// Share of read records that were not skipped, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.records_read == 0 {
            0.0
        } else {
            let used = self.records_read.saturating_sub(self.records_skipped);
            (used as f64 / self.records_read as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let mut stats = ImportStats::new("claimantsCount");
        assert_eq!(stats.success_rate(), 0.0);

        stats.records_read = 4;
        stats.skip("row 2: unknown subject W92000004");
        assert_eq!(stats.records_skipped, 1);
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skip_reasons_are_capped() {
        let mut stats = ImportStats::new("ESAclaimants");
        for row in 0..(MAX_RECORDED_SKIPS + 10) {
            stats.skip(format!("row {row}"));
        }

        assert_eq!(stats.records_skipped, MAX_RECORDED_SKIPS + 10);
        assert_eq!(stats.skip_reasons.len(), MAX_RECORDED_SKIPS);
        assert_eq!(stats.skip_reasons[0], "row 0");
    }
}
