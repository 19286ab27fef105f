use chrono::Duration;
use rand::Rng;

use tracefixture_core::vocab::{
    CR_BACKOUT_DEFAULT, CR_CATEGORIES, CR_CONFLICT_STATUSES, CR_DEPARTMENTS, CR_ENVIRONMENTS,
    CR_IMPLEMENTATION_DEFAULT, CR_RISKS, CR_TYPES, PRIMARY_TEAMS, TEAMS,
};
use tracefixture_core::{
    ChangeRequestRow, CrState, FixtureTable, generation_window_start, sequence_id,
};

use crate::dates::{date_between, ymd};
use crate::foreign::{ForeignContext, MintedIds, sample_list};
use crate::generators::{GeneratorContext, TableGenerator, TableRows};
use crate::text;

/// Change requests handed to each primary team before the rest are spread randomly.
pub const TEAM_QUOTA: usize = 7;

const MAX_STATUS_UPDATES: usize = 3;

/// Change requests, one row per status update.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeRequestGenerator;

impl TableGenerator for ChangeRequestGenerator {
    type Row = ChangeRequestRow;

    fn table(&self) -> FixtureTable {
        FixtureTable::ChangeRequests
    }

    fn generate(
        &self,
        ctx: &mut GeneratorContext<'_>,
        ids: &mut MintedIds,
        count: usize,
    ) -> TableRows<ChangeRequestRow> {
        let mut rows = Vec::with_capacity(count * MAX_STATUS_UPDATES);

        for ordinal in 1..=count {
            let id = sequence_id("CR-FS-", ordinal);
            ids.mint(FixtureTable::ChangeRequests, &id);
            let template = base_row(ctx, ids, id, ordinal - 1);

            let updates = ctx
                .rng
                .random_range(1..=MAX_STATUS_UPDATES)
                .min(CrState::ALL.len());
            let mut last_update = template.start_date;
            for state in CrState::ALL.into_iter().take(updates) {
                let window = ctx.rng.random_range(1..=30);
                let created_at =
                    date_between(&mut ctx.rng, last_update, last_update + Duration::days(window));
                last_update = created_at;
                let span = ctx.rng.random_range(5..=60);
                let end_date =
                    date_between(&mut ctx.rng, created_at, created_at + Duration::days(span));

                rows.push(ChangeRequestRow {
                    state,
                    end_date,
                    updated_by: ctx.user(),
                    created_at,
                    ..template.clone()
                });
            }
        }

        TableRows {
            rows,
            base_rows: count,
        }
    }
}

/// Team for the change request at zero-based `index`.
fn assigned_team(ctx: &mut GeneratorContext<'_>, index: usize) -> String {
    match PRIMARY_TEAMS.get(index / TEAM_QUOTA) {
        Some(team) => team.to_string(),
        None => ctx.pick(TEAMS).to_string(),
    }
}

/// Columns shared by every status-update row of one change request. The
/// per-update columns hold the start date until an update overrides them.
fn base_row(
    ctx: &mut GeneratorContext<'_>,
    ids: &MintedIds,
    id: String,
    index: usize,
) -> ChangeRequestRow {
    let team = assigned_team(ctx, index);
    let start_date = date_between(&mut ctx.rng, generation_window_start(), ymd(2024, 3, 1));
    let linked_issue_id = if ctx.chance(0.5) {
        ids.pick_reference(FixtureTable::Issues, &mut ctx.rng)
    } else {
        None
    };
    let linked_page_id = if ctx.chance(0.3) {
        ids.pick_reference(FixtureTable::WikiPages, &mut ctx.rng)
    } else {
        None
    };
    let risk_percentage = if ctx.chance(0.7) {
        Some(ctx.rng.random_range(0..=100))
    } else {
        None
    };
    let implementation_plan = if ctx.chance(0.5) {
        CR_IMPLEMENTATION_DEFAULT.to_string()
    } else {
        text::sentence(&mut ctx.rng, 6)
    };
    let backout_plan = if ctx.chance(0.5) {
        CR_BACKOUT_DEFAULT.to_string()
    } else {
        text::sentence(&mut ctx.rng, 5)
    };

    ChangeRequestRow {
        id,
        title: text::title(&mut ctx.rng, 5),
        linked_issue_id,
        linked_page_id,
        state: CrState::New,
        requested_by: ctx.user(),
        team,
        assigned_to: ctx.user(),
        environment: ctx.pick(CR_ENVIRONMENTS).to_string(),
        departments: sample_list(CR_DEPARTMENTS, 3, &mut ctx.rng),
        cr_type: ctx.pick(CR_TYPES).to_string(),
        category: ctx.pick(CR_CATEGORIES).to_string(),
        risk: ctx.pick(CR_RISKS).to_string(),
        risk_percentage,
        lead_time_days: ctx.rng.random_range(1..=90),
        conflict_status: ctx.pick(CR_CONFLICT_STATUSES).to_string(),
        description: format!(
            "{} {}",
            text::business_phrase(&mut ctx.rng),
            text::business_phrase(&mut ctx.rng)
        ),
        start_date,
        end_date: start_date,
        implementation_plan,
        backout_plan,
        updated_by: String::new(),
        created_at: start_date,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::generators::test_support::{context, users};

    #[test]
    fn status_updates_are_ordered_and_monotonic() {
        let users = users();
        let mut ctx = context(&users, 12);
        let mut ids = MintedIds::new();
        let output = ChangeRequestGenerator.generate(&mut ctx, &mut ids, 30);

        let mut by_id: BTreeMap<&str, Vec<&ChangeRequestRow>> = BTreeMap::new();
        for row in &output.rows {
            by_id.entry(row.id.as_str()).or_default().push(row);
        }
        assert_eq!(by_id.len(), 30);

        for updates in by_id.values() {
            assert!((1..=MAX_STATUS_UPDATES).contains(&updates.len()));
            let first = updates[0];
            let mut previous = first.start_date;
            for (index, row) in updates.iter().enumerate() {
                assert_eq!(row.state, CrState::ALL[index]);
                assert!(row.created_at >= previous);
                assert!(row.end_date >= row.created_at);
                previous = row.created_at;

                assert_eq!(row.title, first.title);
                assert_eq!(row.team, first.team);
                assert_eq!(row.start_date, first.start_date);
                assert_eq!(row.departments, first.departments);
                assert_eq!(row.linked_issue_id, None, "no issues minted");
            }
        }
    }

    #[test]
    fn primary_teams_fill_their_quota_first() {
        let users = users();
        let mut ctx = context(&users, 2);
        let mut ids = MintedIds::new();
        let output = ChangeRequestGenerator.generate(&mut ctx, &mut ids, 25);

        let mut team_by_id: BTreeMap<String, String> = BTreeMap::new();
        for row in &output.rows {
            team_by_id.insert(row.id.clone(), row.team.clone());
        }
        for (index, team) in team_by_id.values().enumerate() {
            match PRIMARY_TEAMS.get(index / TEAM_QUOTA) {
                Some(expected) => assert_eq!(team, expected),
                None => assert!(TEAMS.contains(&team.as_str())),
            }
        }
    }

    #[test]
    fn links_reference_minted_issues_and_pages() {
        let users = users();
        let mut ctx = context(&users, 30);
        let mut ids = MintedIds::new();
        ids.mint(FixtureTable::Issues, "NOVA-001");
        ids.mint(FixtureTable::WikiPages, "CONF-KB-001");
        let output = ChangeRequestGenerator.generate(&mut ctx, &mut ids, 40);

        assert!(output.rows.iter().any(|row| row.linked_issue_id.is_some()));
        assert!(output.rows.iter().any(|row| row.linked_page_id.is_some()));
        for row in &output.rows {
            if let Some(issue) = &row.linked_issue_id {
                assert_eq!(issue, "NOVA-001");
            }
            if let Some(page) = &row.linked_page_id {
                assert_eq!(page, "CONF-KB-001");
            }
        }
    }
}
