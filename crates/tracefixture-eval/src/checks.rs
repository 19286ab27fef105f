//! Referential and ordering rules over a loaded dataset.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use tracefixture_core::{CrState, FixtureTable, IdPool, IssueRow};

use crate::dataset::Dataset;
use crate::model::Violation;

/// Collects violations for one table.
struct Findings<'a> {
    table: FixtureTable,
    violations: &'a mut Vec<Violation>,
}

impl<'a> Findings<'a> {
    fn new(table: FixtureTable, violations: &'a mut Vec<Violation>) -> Self {
        Self { table, violations }
    }

    fn push(&mut self, code: &str, row_idx: Option<usize>, message: String) {
        self.violations.push(Violation {
            code: code.to_string(),
            table: self.table,
            row_index: row_idx.map(|idx| idx as u64 + 1),
            message,
        });
    }

    /// Flags `target` when `pool` is loaded and does not contain it.
    fn reference(&mut self, pool: Option<&IdPool>, row_idx: usize, field: &str, target: &str) {
        let Some(pool) = pool else {
            return;
        };
        if !pool.contains(target) {
            self.push(
                "dangling_reference",
                Some(row_idx),
                format!("{field} '{target}' does not exist"),
            );
        }
    }

    /// Like [`Findings::reference`], but an absent source file is also a dangling reference.
    fn required_reference(
        &mut self,
        pool: Option<&IdPool>,
        row_idx: usize,
        field: &str,
        target: &str,
    ) {
        match pool {
            Some(pool) => self.reference(Some(pool), row_idx, field, target),
            None => self.push(
                "dangling_reference",
                Some(row_idx),
                format!("{field} '{target}' has no source file"),
            ),
        }
    }

    /// Flags a same-table reference that is missing or not minted before `own_id`.
    fn earlier(&mut self, pool: &IdPool, row_idx: usize, field: &str, own_id: &str, target: &str) {
        match (pool.position(target), pool.position(own_id)) {
            (None, _) => self.push(
                "dangling_reference",
                Some(row_idx),
                format!("{field} '{target}' does not exist"),
            ),
            (Some(target_pos), Some(own_pos)) if target_pos >= own_pos => self.push(
                "forward_reference",
                Some(row_idx),
                format!("{field} '{target}' is not minted before '{own_id}'"),
            ),
            _ => {}
        }
    }
}

/// Source pools of the dataset; `None` when the source file is unreadable.
struct Pools {
    issues: Option<IdPool>,
    pages: Option<IdPool>,
    change_requests: Option<IdPool>,
}

impl Pools {
    fn new(dataset: &Dataset) -> Self {
        Self {
            issues: dataset.issues.present().then(|| dataset.issue_ids()),
            pages: dataset.wiki_pages.present().then(|| dataset.page_ids()),
            change_requests: dataset
                .change_requests
                .present()
                .then(|| dataset.change_request_ids()),
        }
    }
}

/// Runs every rule over the dataset, appending to `violations`.
pub fn check_dataset(dataset: &Dataset, violations: &mut Vec<Violation>) {
    check_upstream_files(dataset, violations);

    let pools = Pools::new(dataset);
    check_issues(dataset, &pools, violations);
    check_wiki_pages(dataset, &pools, violations);
    check_change_requests(dataset, &pools, violations);
    check_change_tasks(dataset, &pools, violations);
    check_issue_activities(dataset, &pools, violations);
}

fn check_upstream_files(dataset: &Dataset, violations: &mut Vec<Violation>) {
    for table in FixtureTable::GENERATION_ORDER {
        if !dataset.is_present(table) {
            continue;
        }
        let mut findings = Findings::new(table, violations);
        for upstream in table.upstream() {
            if !dataset.is_present(*upstream) {
                findings.push(
                    "missing_upstream",
                    None,
                    format!(
                        "{} exists but {} is missing or unreadable",
                        table.file_name(),
                        upstream.file_name()
                    ),
                );
            }
        }
    }
}

fn check_issues(dataset: &Dataset, pools: &Pools, violations: &mut Vec<Violation>) {
    let Some(issue_pool) = pools.issues.as_ref() else {
        return;
    };
    let rows = dataset.issues.rows();
    let mut findings = Findings::new(FixtureTable::Issues, violations);
    let mut base_rows: BTreeMap<&str, usize> = BTreeMap::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let entry = base_rows.entry(row.id.as_str()).or_default();
        if row.is_base_row() {
            *entry += 1;
        }

        if row.linked_issue_id.is_some() && row.watcher.is_some() {
            findings.push(
                "satellite_row_shape",
                Some(row_idx),
                format!("'{}' carries both a link and a watcher", row.id),
            );
        }
        if row.linked_issue_id.is_some() != row.link_type.is_some() {
            findings.push(
                "satellite_row_shape",
                Some(row_idx),
                format!("'{}' has a link target without a link type", row.id),
            );
        }

        if let Some(target) = row.linked_issue_id.as_deref() {
            findings.earlier(
                issue_pool,
                row_idx,
                "JIRA_Linked_Issue_ID_Target",
                &row.id,
                target,
            );
        }
        if let Some(target) = row.change_request_id.as_deref() {
            findings.required_reference(
                pools.change_requests.as_ref(),
                row_idx,
                "CR_ID_Link_From_CSV_Example",
                target,
            );
        }
    }

    let distinct = issue_pool.len();
    let base_total: usize = base_rows.values().sum();
    if base_total != distinct {
        findings.push(
            "base_row_count",
            None,
            format!("{base_total} base row(s) for {distinct} distinct issue id(s)"),
        );
    }
    for (id, count) in base_rows {
        if count != 1 {
            findings.push(
                "base_row_count",
                None,
                format!("issue '{id}' has {count} base row(s)"),
            );
        }
    }
    check_satellites_match_base(rows, &mut findings);
}

/// Satellite rows repeat their issue's scalar fields verbatim.
fn check_satellites_match_base(rows: &[IssueRow], findings: &mut Findings<'_>) {
    let mut bases: HashMap<&str, IssueRow> = HashMap::new();
    for row in rows.iter().filter(|row| row.is_base_row()) {
        bases.entry(row.id.as_str()).or_insert_with(|| row.clone());
    }

    for (row_idx, row) in rows.iter().enumerate() {
        if row.is_base_row() {
            continue;
        }
        let Some(base) = bases.get(row.id.as_str()) else {
            continue;
        };
        let mut stripped = row.clone();
        stripped.linked_issue_id = None;
        stripped.link_type = None;
        stripped.watcher = None;
        if &stripped != base {
            findings.push(
                "satellite_row_shape",
                Some(row_idx),
                format!("satellite row of '{}' differs from its base row", row.id),
            );
        }
    }
}

fn check_wiki_pages(dataset: &Dataset, pools: &Pools, violations: &mut Vec<Violation>) {
    let Some(page_pool) = pools.pages.as_ref() else {
        return;
    };
    let mut findings = Findings::new(FixtureTable::WikiPages, violations);

    for (row_idx, row) in dataset.wiki_pages.rows().iter().enumerate() {
        for issue_id in row.linked_issue_ids.iter() {
            findings.reference(
                pools.issues.as_ref(),
                row_idx,
                "Confluence_Linked_Jira_ID",
                issue_id,
            );
        }
        for cr_id in row.linked_change_request_ids.iter() {
            findings.required_reference(
                pools.change_requests.as_ref(),
                row_idx,
                "Confluence_Linked_CR_ID",
                cr_id,
            );
        }

        let Some(parent) = row.parent_page_id.as_deref() else {
            continue;
        };
        if parent == row.id {
            findings.push(
                "self_parent",
                Some(row_idx),
                format!("page '{}' is its own parent", row.id),
            );
            continue;
        }
        findings.earlier(page_pool, row_idx, "Confluence_Parent_Page_ID", &row.id, parent);
    }
}

/// Row index, state, start date and created-at of one status-update row.
type StatusUpdate = (usize, CrState, NaiveDate, NaiveDate);

fn check_change_requests(dataset: &Dataset, pools: &Pools, violations: &mut Vec<Violation>) {
    if !dataset.change_requests.present() {
        return;
    }
    let mut findings = Findings::new(FixtureTable::ChangeRequests, violations);
    let mut updates: Vec<(&str, Vec<StatusUpdate>)> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();

    for (row_idx, row) in dataset.change_requests.rows().iter().enumerate() {
        if let Some(issue_id) = row.linked_issue_id.as_deref() {
            findings.reference(pools.issues.as_ref(), row_idx, "Linked_Jira_ID", issue_id);
        }
        if let Some(page_id) = row.linked_page_id.as_deref() {
            findings.reference(pools.pages.as_ref(), row_idx, "Linked_Confluence_ID", page_id);
        }

        let group = *group_of.entry(row.id.as_str()).or_insert_with(|| {
            updates.push((row.id.as_str(), Vec::new()));
            updates.len() - 1
        });
        updates[group]
            .1
            .push((row_idx, row.state, row.start_date, row.created_at));
    }

    for (id, rows) in &updates {
        for (position, (row_idx, state, _, _)) in rows.iter().enumerate() {
            if state.ordinal() != position {
                let expected = CrState::from_ordinal(position)
                    .map(|state| state.as_str())
                    .unwrap_or("none");
                findings.push(
                    "state_order",
                    Some(*row_idx),
                    format!("'{id}' update {} is {state}, expected {expected}", position + 1),
                );
            }
        }

        let mut previous = rows.first().map(|(_, _, start, _)| *start);
        for (row_idx, _, _, created_at) in rows {
            match previous {
                Some(prev) if *created_at < prev => findings.push(
                    "non_monotonic_status",
                    Some(*row_idx),
                    format!("'{id}' update dated {created_at} precedes {prev}"),
                ),
                _ => {}
            }
            previous = Some(*created_at);
        }
    }
}

fn check_change_tasks(dataset: &Dataset, pools: &Pools, violations: &mut Vec<Violation>) {
    if !dataset.change_tasks.present() {
        return;
    }
    let mut findings = Findings::new(FixtureTable::ChangeTasks, violations);
    let mut seen = HashSet::new();

    for (row_idx, row) in dataset.change_tasks.rows().iter().enumerate() {
        if !seen.insert(row.id.as_str()) {
            findings.push(
                "duplicate_id",
                Some(row_idx),
                format!("change task '{}' appears more than once", row.id),
            );
        }
        findings.reference(
            pools.change_requests.as_ref(),
            row_idx,
            "CR_ID",
            &row.change_request_id,
        );
        if row.end_time < row.start_time {
            findings.push(
                "task_interval",
                Some(row_idx),
                format!(
                    "task '{}' ends at {} before it starts at {}",
                    row.id, row.end_time, row.start_time
                ),
            );
        }
    }
}

fn check_issue_activities(dataset: &Dataset, pools: &Pools, violations: &mut Vec<Violation>) {
    if !dataset.issue_activities.present() {
        return;
    }
    let mut findings = Findings::new(FixtureTable::IssueActivities, violations);
    let mut seen = HashSet::new();

    for (row_idx, row) in dataset.issue_activities.rows().iter().enumerate() {
        if !seen.insert(row.id.as_str()) {
            findings.push(
                "duplicate_id",
                Some(row_idx),
                format!("activity '{}' appears more than once", row.id),
            );
        }
        findings.reference(pools.issues.as_ref(), row_idx, "JIRA_ID", &row.issue_id);
    }
}
