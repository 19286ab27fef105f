use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use tracefixture_core::REPORT_VERSION;
use tracing::{info, warn};

use crate::checks::check_dataset;
use crate::dataset::Dataset;
use crate::errors::EvalError;
use crate::model::{CheckOptions, IntegrityReport, Violation};

/// Check a fixture directory for referential and ordering integrity.
#[derive(Debug, Clone, Default)]
pub struct IntegrityChecker {
    options: CheckOptions,
}

impl IntegrityChecker {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, dataset_dir: &Path) -> Result<IntegrityReport, EvalError> {
        let start = Instant::now();
        let mut violations = Vec::new();

        let dataset = Dataset::load(dataset_dir, &mut violations)?;
        let tables = dataset.summaries();
        for summary in &tables {
            if summary.present {
                info!(
                    table = summary.table.as_str(),
                    rows = summary.rows,
                    distinct_ids = summary.distinct_ids,
                    "table loaded"
                );
            }
        }
        if tables.iter().all(|summary| !summary.present) {
            warn!(dir = %dataset_dir.display(), "no fixture files found");
        }

        check_dataset(&dataset, &mut violations);
        sort_violations(&mut violations);

        let mut violations_by_code: BTreeMap<String, u64> = BTreeMap::new();
        for violation in &violations {
            *violations_by_code.entry(violation.code.clone()).or_default() += 1;
        }

        let report = IntegrityReport {
            report_version: REPORT_VERSION.to_string(),
            dataset_dir: dataset_dir.to_path_buf(),
            tables,
            violations_by_code,
            violations,
        };

        if let Some(path) = &self.options.report_path {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_vec_pretty(&report)?)?;
        }

        info!(
            violations = report.violations.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "integrity check finished"
        );

        if self.options.strict && !report.is_clean() {
            return Err(EvalError::Violations(report.violations.len() as u64));
        }

        Ok(report)
    }
}

fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        (a.table, a.row_index.unwrap_or_default(), a.code.as_str()).cmp(&(
            b.table,
            b.row_index.unwrap_or_default(),
            b.code.as_str(),
        ))
    });
}
