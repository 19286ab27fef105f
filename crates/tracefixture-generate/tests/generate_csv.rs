use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use tracefixture_core::{
    ChangeRequestRow, ChangeTaskRow, FixtureTable, IssueActivityRow, IssueRow, RowCounts,
    WikiPageRow,
};
use tracefixture_eval::{CheckOptions, IntegrityChecker};
use tracefixture_generate::{GenerateOptions, GenerationEngine};

fn hash_file(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "tracefixture_generate_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn options(out_dir: PathBuf, seed: u64) -> GenerateOptions {
    GenerateOptions {
        out_dir,
        seed: Some(seed),
        reference_time: NaiveDate::from_ymd_opt(2024, 7, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0)),
        ..GenerateOptions::default()
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(dir: &Path, table: FixtureTable) -> Vec<T> {
    let mut reader = csv::Reader::from_path(dir.join(table.file_name())).expect("open csv");
    let header: Vec<String> = reader
        .headers()
        .expect("read header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(header, table.header(), "header of {table}");
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .expect("deserialize rows")
}

#[test]
fn generate_is_deterministic() {
    let out_a = temp_out_dir("run_a");
    let out_b = temp_out_dir("run_b");

    GenerationEngine::new(options(out_a.clone(), 1234))
        .run()
        .expect("run generation A");
    GenerationEngine::new(options(out_b.clone(), 1234))
        .run()
        .expect("run generation B");

    for table in FixtureTable::GENERATION_ORDER {
        let hash_a = hash_file(&out_a.join(table.file_name())).expect("hash A");
        let hash_b = hash_file(&out_b.join(table.file_name())).expect("hash B");
        assert_eq!(hash_a, hash_b, "{} should be deterministic", table.file_name());
    }
}

#[test]
fn changing_one_count_leaves_other_tables_alone() {
    let out_a = temp_out_dir("count_a");
    let out_b = temp_out_dir("count_b");

    GenerationEngine::new(options(out_a.clone(), 99))
        .run()
        .expect("run generation A");
    let mut altered = options(out_b.clone(), 99);
    altered.counts.issue_activities = 5;
    GenerationEngine::new(altered).run().expect("run generation B");

    for table in [FixtureTable::Issues, FixtureTable::WikiPages, FixtureTable::ChangeRequests] {
        let hash_a = hash_file(&out_a.join(table.file_name())).expect("hash A");
        let hash_b = hash_file(&out_b.join(table.file_name())).expect("hash B");
        assert_eq!(hash_a, hash_b, "{table}");
    }
}

#[test]
fn generate_respects_row_counts_and_references() {
    let out_dir = temp_out_dir("run_rows");
    let mut opts = options(out_dir.clone(), 7);
    opts.report_path = Some(out_dir.join("generation_report.json"));
    let result = GenerationEngine::new(opts).run().expect("run generation");

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out_dir.join("generation_report.json")).expect("read report"),
    )
    .expect("parse report");
    assert_eq!(report.get("seed").and_then(|value| value.as_u64()), Some(7));

    let issues: Vec<IssueRow> = read_rows(&out_dir, FixtureTable::Issues);
    let pages: Vec<WikiPageRow> = read_rows(&out_dir, FixtureTable::WikiPages);
    let change_requests: Vec<ChangeRequestRow> = read_rows(&out_dir, FixtureTable::ChangeRequests);
    let tasks: Vec<ChangeTaskRow> = read_rows(&out_dir, FixtureTable::ChangeTasks);
    let activities: Vec<IssueActivityRow> = read_rows(&out_dir, FixtureTable::IssueActivities);

    let issue_ids: BTreeSet<&str> = issues.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(issue_ids.len(), 72);
    assert_eq!(issues.iter().filter(|row| row.is_base_row()).count(), 72);
    let issue_report = result.report.table(FixtureTable::Issues).expect("issue report");
    assert_eq!(issue_report.base_rows, 72);
    assert_eq!(issue_report.rows_written, issues.len() as u64);

    let page_ids: BTreeSet<&str> = pages.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(pages.len(), 23);
    assert_eq!(page_ids.len(), 23);

    let cr_ids: BTreeSet<&str> = change_requests.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(cr_ids.len(), 22);
    assert!(change_requests.len() >= 22 && change_requests.len() <= 66);

    assert_eq!(tasks.len(), 18);
    assert_eq!(activities.len(), 35);

    for row in &issues {
        if let Some(target) = &row.linked_issue_id {
            assert!(issue_ids.contains(target.as_str()));
        }
        assert!(row.change_request_id.is_none());
    }
    for row in &pages {
        assert!(row.linked_issue_ids.iter().all(|id| issue_ids.contains(id)));
        assert!(row.linked_change_request_ids.is_empty());
        if let Some(parent) = &row.parent_page_id {
            assert_ne!(parent, &row.id);
            assert!(page_ids.contains(parent.as_str()));
        }
    }

    let mut last_update: BTreeMap<&str, NaiveDate> = BTreeMap::new();
    for row in &change_requests {
        if let Some(issue) = &row.linked_issue_id {
            assert!(issue_ids.contains(issue.as_str()));
        }
        if let Some(page) = &row.linked_page_id {
            assert!(page_ids.contains(page.as_str()));
        }
        if let Some(previous) = last_update.insert(row.id.as_str(), row.created_at) {
            assert!(row.created_at >= previous, "{} went back in time", row.id);
        }
    }
    for row in &tasks {
        assert!(cr_ids.contains(row.change_request_id.as_str()));
        assert!(row.end_time > row.start_time);
    }
    for row in &activities {
        assert!(issue_ids.contains(row.issue_id.as_str()));
    }
}

#[test]
fn empty_upstream_skips_dependent_tables() {
    let out_dir = temp_out_dir("run_empty");
    let mut opts = options(out_dir.clone(), 5);
    opts.counts = RowCounts {
        issues: 0,
        change_requests: 0,
        ..RowCounts::default()
    };

    let result = GenerationEngine::new(opts).run().expect("run generation");

    assert_eq!(
        result.report.skipped,
        vec![FixtureTable::ChangeTasks, FixtureTable::IssueActivities]
    );
    assert_eq!(
        result.report.warnings_by_code.get("empty_upstream_pool"),
        Some(&2)
    );
    assert!(!out_dir.join(FixtureTable::ChangeTasks.file_name()).exists());
    assert!(!out_dir.join(FixtureTable::IssueActivities.file_name()).exists());

    let pages: Vec<WikiPageRow> = read_rows(&out_dir, FixtureTable::WikiPages);
    assert_eq!(pages.len(), 23);
    assert!(pages.iter().all(|row| row.linked_issue_ids.is_empty()));

    let issues: Vec<IssueRow> = read_rows(&out_dir, FixtureTable::Issues);
    assert!(issues.is_empty());
}

#[test]
fn rerun_with_skipped_table_removes_previous_file() {
    let out_dir = temp_out_dir("run_rerun");
    GenerationEngine::new(options(out_dir.clone(), 3))
        .run()
        .expect("first run");
    let tasks_path = out_dir.join(FixtureTable::ChangeTasks.file_name());
    assert!(tasks_path.exists());

    let mut rerun = options(out_dir.clone(), 4);
    rerun.counts.change_requests = 0;
    let result = GenerationEngine::new(rerun).run().expect("second run");
    assert_eq!(result.report.skipped, vec![FixtureTable::ChangeTasks]);
    assert!(!tasks_path.exists());

    let report = IntegrityChecker::new(CheckOptions::default())
        .run(&out_dir)
        .expect("check output");
    assert!(report.is_clean(), "violations: {:?}", report.violations);
}

#[test]
fn invalid_counts_are_rejected_before_writing() {
    let out_dir = temp_out_dir("run_invalid").join("nested");
    let mut opts = options(out_dir.clone(), 5);
    opts.users = 0;

    let err = GenerationEngine::new(opts).run().expect_err("zero users is invalid");
    assert!(err.to_string().contains("users"));
    assert!(!out_dir.exists());
}
