use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use tracefixture_core::FixtureTable;

/// Options for an integrity check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Fail when any violation is found.
    pub strict: bool,
    /// Also write `integrity_report.json` to this path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

/// Row counts for one table of the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: FixtureTable,
    pub file: PathBuf,
    pub present: bool,
    pub rows: u64,
    pub distinct_ids: u64,
}

/// Structured violation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub table: FixtureTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u64>,
    pub message: String,
}

/// Outcome of checking one dataset directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub report_version: String,
    pub dataset_dir: PathBuf,
    pub tables: Vec<TableSummary>,
    pub violations_by_code: BTreeMap<String, u64>,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn table(&self, table: FixtureTable) -> Option<&TableSummary> {
        self.tables.iter().find(|summary| summary.table == table)
    }

    pub fn count(&self, code: &str) -> u64 {
        self.violations_by_code.get(code).copied().unwrap_or(0)
    }
}
