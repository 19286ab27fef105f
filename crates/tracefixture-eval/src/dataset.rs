use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use tracefixture_core::{
    ChangeRequestRow, ChangeTaskRow, FixtureTable, IdPool, IssueActivityRow, IssueRow,
    WikiPageRow,
};

use crate::errors::EvalError;
use crate::model::{TableSummary, Violation};

/// One table read back from disk. `rows` is `None` when the file is absent or
/// its header does not match the fixed layout.
#[derive(Debug, Clone)]
pub struct LoadedTable<T> {
    pub table: FixtureTable,
    pub path: PathBuf,
    pub rows: Option<Vec<T>>,
}

impl<T> LoadedTable<T> {
    pub fn present(&self) -> bool {
        self.rows.is_some()
    }

    pub fn rows(&self) -> &[T] {
        self.rows.as_deref().unwrap_or_default()
    }

    pub fn summary(&self, distinct_ids: usize) -> TableSummary {
        TableSummary {
            table: self.table,
            file: self.path.clone(),
            present: self.present(),
            rows: self.rows().len() as u64,
            distinct_ids: distinct_ids as u64,
        }
    }
}

/// All five tables of a dataset directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub issues: LoadedTable<IssueRow>,
    pub wiki_pages: LoadedTable<WikiPageRow>,
    pub change_requests: LoadedTable<ChangeRequestRow>,
    pub change_tasks: LoadedTable<ChangeTaskRow>,
    pub issue_activities: LoadedTable<IssueActivityRow>,
}

impl Dataset {
    pub fn load(dir: &Path, violations: &mut Vec<Violation>) -> Result<Self, EvalError> {
        if !dir.is_dir() {
            return Err(EvalError::InvalidDataset(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }

        Ok(Self {
            issues: load_table(dir, FixtureTable::Issues, violations)?,
            wiki_pages: load_table(dir, FixtureTable::WikiPages, violations)?,
            change_requests: load_table(dir, FixtureTable::ChangeRequests, violations)?,
            change_tasks: load_table(dir, FixtureTable::ChangeTasks, violations)?,
            issue_activities: load_table(dir, FixtureTable::IssueActivities, violations)?,
        })
    }

    pub fn is_present(&self, table: FixtureTable) -> bool {
        match table {
            FixtureTable::Issues => self.issues.present(),
            FixtureTable::WikiPages => self.wiki_pages.present(),
            FixtureTable::ChangeRequests => self.change_requests.present(),
            FixtureTable::ChangeTasks => self.change_tasks.present(),
            FixtureTable::IssueActivities => self.issue_activities.present(),
        }
    }

    pub fn issue_ids(&self) -> IdPool {
        self.issues.rows().iter().map(|row| row.id.clone()).collect()
    }

    pub fn page_ids(&self) -> IdPool {
        self.wiki_pages.rows().iter().map(|row| row.id.clone()).collect()
    }

    pub fn change_request_ids(&self) -> IdPool {
        self.change_requests
            .rows()
            .iter()
            .map(|row| row.id.clone())
            .collect()
    }

    pub fn summaries(&self) -> Vec<TableSummary> {
        vec![
            self.issues.summary(self.issue_ids().len()),
            self.wiki_pages.summary(self.page_ids().len()),
            self.change_requests.summary(self.change_request_ids().len()),
            self.change_tasks.summary(distinct(
                self.change_tasks.rows().iter().map(|row| row.id.clone()),
            )),
            self.issue_activities.summary(distinct(
                self.issue_activities.rows().iter().map(|row| row.id.clone()),
            )),
        ]
    }
}

fn distinct(ids: impl Iterator<Item = String>) -> usize {
    ids.collect::<IdPool>().len()
}

fn load_table<T: DeserializeOwned>(
    dir: &Path,
    table: FixtureTable,
    violations: &mut Vec<Violation>,
) -> Result<LoadedTable<T>, EvalError> {
    let path = dir.join(table.file_name());
    if !path.exists() {
        return Ok(LoadedTable {
            table,
            path,
            rows: None,
        });
    }

    let mut reader = csv::Reader::from_path(&path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header != table.header() {
        violations.push(Violation {
            code: "header_mismatch".to_string(),
            table,
            row_index: None,
            message: format!(
                "{} header is [{}], expected [{}]",
                table.file_name(),
                header.join(", "),
                table.header().join(", ")
            ),
        });
        return Ok(LoadedTable {
            table,
            path,
            rows: None,
        });
    }

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        let row: T = record.map_err(|err| {
            EvalError::InvalidDataset(format!(
                "{} row {}: {err}",
                table.file_name(),
                index + 1
            ))
        })?;
        rows.push(row);
    }

    Ok(LoadedTable {
        table,
        path,
        rows: Some(rows),
    })
}
