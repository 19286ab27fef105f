use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tracefixture_core::{FixtureConfig, FixtureTable, RowCounts};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory the CSV files are written to.
    pub out_dir: PathBuf,
    pub counts: RowCounts,
    pub users: usize,
    pub seed: Option<u64>,
    /// Stand-in for "now". Defaults to the current UTC time, truncated to the minute.
    pub reference_time: Option<NaiveDateTime>,
    /// Also write `generation_report.json` to this path.
    pub report_path: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&FixtureConfig::default())
    }
}

impl GenerateOptions {
    pub fn from_config(config: &FixtureConfig) -> Self {
        Self {
            out_dir: config.out_dir.clone(),
            counts: config.counts.clone(),
            users: config.users,
            seed: config.seed,
            reference_time: config
                .reference_date
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            report_path: None,
        }
    }

    pub fn requested(&self, table: FixtureTable) -> usize {
        match table {
            FixtureTable::Issues => self.counts.issues,
            FixtureTable::WikiPages => self.counts.wiki_pages,
            FixtureTable::ChangeRequests => self.counts.change_requests,
            FixtureTable::ChangeTasks => self.counts.change_tasks,
            FixtureTable::IssueActivities => self.counts.issue_activities,
        }
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: FixtureTable,
    pub file: PathBuf,
    pub rows_requested: u64,
    /// Rows describing a distinct entity (one per minted id).
    pub base_rows: u64,
    /// All data rows written, including link, watcher and status-update rows.
    pub rows_written: u64,
    pub bytes_written: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<FixtureTable>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub report_version: String,
    pub run_id: String,
    pub seed: u64,
    pub reference_time: NaiveDateTime,
    pub users: Vec<String>,
    pub tables: Vec<TableReport>,
    pub skipped: Vec<FixtureTable>,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, reference_time: NaiveDateTime) -> Self {
        Self {
            report_version: tracefixture_core::REPORT_VERSION.to_string(),
            run_id,
            seed,
            reference_time,
            users: Vec::new(),
            tables: Vec::new(),
            skipped: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn table(&self, table: FixtureTable) -> Option<&TableReport> {
        self.tables.iter().find(|report| report.table == table)
    }

    pub fn record_table(&mut self, report: TableReport) {
        self.bytes_written += report.bytes_written;
        self.tables.push(report);
    }

    pub fn record_skipped(&mut self, table: FixtureTable, issue: GenerationIssue) {
        self.skipped.push(table);
        self.record_warning(issue);
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}
