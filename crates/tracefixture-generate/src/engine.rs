use std::time::Instant;

use chrono::NaiveDateTime;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use tracefixture_core::{FixtureConfig, validate_config};

use crate::dates::truncate_to_minute;
use crate::errors::GenerationError;
use crate::foreign::{ForeignContext, MintedIds};
use crate::generators::{
    ChangeRequestGenerator, ChangeTaskGenerator, GeneratorContext, IssueActivityGenerator,
    IssueGenerator, TableGenerator, WikiPageGenerator,
};
use crate::model::{GenerateOptions, GenerationIssue, GenerationReport, TableReport};
use crate::output::csv::write_table_csv;
use crate::roster::build_user_roster;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub report: GenerationReport,
}

/// Entry point for generating the five fixture tables.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

struct RunState<'a> {
    seed: u64,
    reference_time: NaiveDateTime,
    users: &'a [String],
    ids: MintedIds,
    report: GenerationReport,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        validate_config(&FixtureConfig {
            counts: self.options.counts.clone(),
            users: self.options.users,
            seed: self.options.seed,
            reference_date: self.options.reference_time.map(|time| time.date()),
            out_dir: self.options.out_dir.clone(),
        })?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self.options.seed.unwrap_or_else(|| rand::rng().random());
        let reference_time = truncate_to_minute(
            self.options
                .reference_time
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
        );
        std::fs::create_dir_all(&self.options.out_dir)?;

        info!(
            run_id = %run_id,
            seed,
            reference_time = %reference_time,
            out_dir = %self.options.out_dir.display(),
            "generation started"
        );

        let mut roster_rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "users"));
        let users = build_user_roster(&mut roster_rng, self.options.users);

        let mut report = GenerationReport::new(run_id.clone(), seed, reference_time);
        report.users = users.clone();
        let mut state = RunState {
            seed,
            reference_time,
            users: &users,
            ids: MintedIds::new(),
            report,
        };

        // Order matters: each table may only reference ids minted before it.
        self.run_table(&IssueGenerator, &mut state)?;
        self.run_table(&WikiPageGenerator, &mut state)?;
        self.run_table(&ChangeRequestGenerator, &mut state)?;
        self.run_table(&ChangeTaskGenerator, &mut state)?;
        self.run_table(&IssueActivityGenerator, &mut state)?;

        let mut report = state.report;
        report.duration_ms = start.elapsed().as_millis() as u64;

        if let Some(report_path) = &self.options.report_path {
            if let Some(parent) = report_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(report_path, serde_json::to_vec_pretty(&report)?)?;
        }

        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            skipped = report.skipped.len(),
            duration_ms = report.duration_ms,
            bytes_written = report.bytes_written,
            "generation completed"
        );

        Ok(GenerationResult { report })
    }

    fn run_table<G: TableGenerator>(
        &self,
        generator: &G,
        state: &mut RunState<'_>,
    ) -> Result<(), GenerationError> {
        let table = generator.table();
        let requested = self.options.requested(table);

        if let Some(upstream) = generator.required_upstream() {
            if state.ids.ids(upstream).is_empty() {
                let message = format!(
                    "cannot generate {}: no {} ids available",
                    table.file_name(),
                    upstream
                );
                warn!(table = %table, upstream = %upstream, "{message}");
                state.report.record_skipped(
                    table,
                    GenerationIssue {
                        level: "warning".to_string(),
                        code: "empty_upstream_pool".to_string(),
                        message,
                        table: Some(table),
                    },
                );

                let stale = self.options.out_dir.join(table.file_name());
                if stale.exists() {
                    std::fs::remove_file(&stale)?;
                    warn!(
                        table = %table,
                        file = %stale.display(),
                        "removed file from a previous run"
                    );
                }
                return Ok(());
            }
        }

        let table_start = Instant::now();
        info!(table = %table, rows = requested, "generating table");

        let mut ctx = GeneratorContext::new(
            state.users,
            state.reference_time,
            hash_seed(state.seed, table.as_str()),
        );
        let output = generator.generate(&mut ctx, &mut state.ids, requested);

        let path = self.options.out_dir.join(table.file_name());
        let bytes_written = write_table_csv(&path, table, &output.rows)?;

        info!(
            table = %table,
            file = %path.display(),
            base_rows = output.base_rows,
            rows_written = output.rows.len(),
            bytes_written,
            duration_ms = table_start.elapsed().as_millis() as u64,
            "table generated"
        );

        state.report.record_table(TableReport {
            table,
            file: path,
            rows_requested: requested as u64,
            base_rows: output.base_rows as u64,
            rows_written: output.rows.len() as u64,
            bytes_written,
        });
        Ok(())
    }
}

/// Seed for one stream of the run, so each table's draws are independent of
/// the other tables' counts.
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use tracefixture_core::FixtureTable;

    use super::*;

    #[test]
    fn hash_seed_separates_streams() {
        let issues = hash_seed(7, FixtureTable::Issues.as_str());
        let pages = hash_seed(7, FixtureTable::WikiPages.as_str());
        assert_ne!(issues, pages);
        assert_eq!(issues, hash_seed(7, "issues"));
        assert_ne!(issues, hash_seed(8, "issues"));
    }
}
