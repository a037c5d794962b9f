//! Column lookup for CSV sources
//!
//! Headers are matched case-insensitively: Nomis extracts use upper-case
//! headers while Space Syntax tables use lower case, and both are keyed
//! here by their upper-cased, trimmed name.

use crate::error::{ImporterError, Result};
use csv::StringRecord;
use std::collections::HashMap;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Header name to column index mapping for one CSV source
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Upper-cased column name to index
    pub name_to_index: HashMap<String, usize>,

    /// File or archive entry the headers came from, for error messages
    pub source_name: String,
}

impl ColumnMapping {
    pub fn analyze(headers: &StringRecord, source_name: impl Into<String>) -> Self {
        let mut name_to_index = HashMap::new();

        for (index, header) in headers.iter().enumerate() {
            let column_name = normalize(header);
            // First occurrence wins for duplicated headers
            name_to_index.entry(column_name).or_insert(index);
        }

        Self {
            name_to_index,
            source_name: source_name.into(),
        }
    }

    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(&normalize(column_name)).copied()
    }

    /// Index of a column that must be present
    pub fn require(&self, column_name: &str) -> Result<usize> {
        self.get_index(column_name)
            .ok_or_else(|| ImporterError::missing_column(column_name, self.source_name.clone()))
    }

    pub fn column_count(&self) -> usize {
        self.name_to_index.len()
    }
}

fn normalize(header: &str) -> String {
    header.trim_start_matches(BYTE_ORDER_MARK).trim().to_uppercase()
}

/// Trimmed, non-empty field at `index`
pub fn field(record: &StringRecord, index: usize) -> Option<&str> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Numeric field at `index`; `None` for empty or non-numeric cells
pub fn numeric_field(record: &StringRecord, index: usize) -> Option<f64> {
    field(record, index)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
