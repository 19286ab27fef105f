use chrono::Duration;
use rand::Rng;
use rand::seq::IndexedRandom;

use tracefixture_core::vocab::{
    APP_NAMES, ISSUE_ALT_PREFIXES, ISSUE_COMPONENTS, ISSUE_DEFAULT_PREFIX, ISSUE_LABELS,
    ISSUE_PRIORITIES, ISSUE_STATUSES, ISSUE_TYPES, PRIMARY_TEAMS, RELEASE_SUFFIXES,
    SPRINT_STREAMS, STORY_POINTS,
};
use tracefixture_core::{FixtureTable, IssueRow, LinkType, generation_window_start, sequence_id};

use crate::dates::{date_between, ymd};
use crate::foreign::{ForeignContext, MintedIds, sample_list};
use crate::generators::{GeneratorContext, TableGenerator, TableRows};
use crate::text;

const MAX_LINKS: usize = 2;
const MAX_WATCHERS: usize = 3;

/// Issues: one base row per issue, plus one row per link and per watcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueGenerator;

impl TableGenerator for IssueGenerator {
    type Row = IssueRow;

    fn table(&self) -> FixtureTable {
        FixtureTable::Issues
    }

    fn generate(
        &self,
        ctx: &mut GeneratorContext<'_>,
        ids: &mut MintedIds,
        count: usize,
    ) -> TableRows<IssueRow> {
        let mut rows = Vec::with_capacity(count * 3);

        for ordinal in 1..=count {
            let id = issue_id(ctx, ordinal);
            ids.mint(FixtureTable::Issues, &id);
            let base = base_row(ctx, ids, id);
            rows.push(base.clone());

            let minted = ids.ids(FixtureTable::Issues).as_slice();
            let earlier = &minted[..minted.len().saturating_sub(1)];
            let wanted = ctx.rng.random_range(0..=MAX_LINKS);
            if wanted > 0 && !earlier.is_empty() {
                for target in earlier.choose_multiple(&mut ctx.rng, wanted.min(earlier.len())) {
                    let link_type = LinkType::ALL
                        .choose(&mut ctx.rng)
                        .copied()
                        .unwrap_or(LinkType::RelatesTo);
                    rows.push(base.with_link(target, link_type));
                }
            }

            let watchers = ctx.rng.random_range(0..=MAX_WATCHERS);
            for _ in 0..watchers {
                let watcher = ctx.user();
                rows.push(base.with_watcher(&watcher));
            }
        }

        TableRows {
            rows,
            base_rows: count,
        }
    }
}

fn issue_id(ctx: &mut GeneratorContext<'_>, ordinal: usize) -> String {
    let prefix = if ctx.chance(0.2) {
        ctx.pick(ISSUE_ALT_PREFIXES)
    } else {
        ISSUE_DEFAULT_PREFIX
    };
    sequence_id(&format!("{prefix}-"), ordinal)
}

fn base_row(ctx: &mut GeneratorContext<'_>, ids: &MintedIds, id: String) -> IssueRow {
    let created_date = date_between(&mut ctx.rng, generation_window_start(), ymd(2024, 4, 1));
    let start_date = date_between(&mut ctx.rng, created_date, created_date + Duration::days(10));
    let span = ctx.rng.random_range(5..=60);
    let end_date = date_between(&mut ctx.rng, start_date, start_date + Duration::days(span));
    let today = ctx.reference_date();
    let updated_ceiling = if end_date < today {
        end_date
    } else {
        today - Duration::days(1)
    };
    let updated_date = date_between(&mut ctx.rng, created_date, updated_ceiling);

    let components = sample_list(ISSUE_COMPONENTS, 3, &mut ctx.rng);
    let labels = sample_list(ISSUE_LABELS, 3, &mut ctx.rng);
    let sprint = format!(
        "Sprint {} - {}",
        ctx.rng.random_range(1..=5),
        ctx.pick(SPRINT_STREAMS)
    );
    let app_name = if ctx.chance(0.7) {
        Some(ctx.pick(APP_NAMES)).filter(|name| !name.is_empty())
    } else {
        None
    };
    let fix_version = format!(
        "v{}.{}.{}{}",
        ctx.rng.random_range(0..=2),
        ctx.rng.random_range(1..=9),
        ctx.rng.random_range(0..=5),
        ctx.pick(RELEASE_SUFFIXES)
    );
    let confidence = if ctx.chance(0.5) {
        Some(ctx.rng.random_range(50..=100))
    } else {
        None
    };
    let story_points = if ctx.chance(0.8) {
        STORY_POINTS.choose(&mut ctx.rng).copied()
    } else {
        None
    };
    let change_request_id = if ctx.chance(0.4) {
        ids.pick_reference(FixtureTable::ChangeRequests, &mut ctx.rng)
    } else {
        None
    };

    IssueRow {
        id,
        issue_type: ctx.pick(ISSUE_TYPES).to_string(),
        priority: ctx.pick(ISSUE_PRIORITIES).to_string(),
        components,
        labels,
        sprint,
        app_name: app_name.map(str::to_string),
        reporter: ctx.user(),
        assignee: ctx.user(),
        start_date,
        end_date,
        status: ctx.pick(ISSUE_STATUSES).to_string(),
        title: text::capitalize(&text::business_phrase(&mut ctx.rng)),
        description: text::sentence(&mut ctx.rng, 10),
        fix_version,
        team: ctx.pick(PRIMARY_TEAMS).to_string(),
        confidence,
        created_date,
        updated_date,
        story_points,
        change_request_id,
        linked_issue_id: None,
        link_type: None,
        watcher: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::generators::test_support::{context, users};

    #[test]
    fn links_point_backwards_and_satellites_share_base_fields() {
        let users = users();
        let mut ctx = context(&users, 17);
        let mut ids = MintedIds::new();
        let output = IssueGenerator.generate(&mut ctx, &mut ids, 40);

        assert_eq!(output.base_rows, 40);
        assert_eq!(ids.ids(FixtureTable::Issues).len(), 40);

        let mut bases: BTreeMap<String, IssueRow> = BTreeMap::new();
        for row in &output.rows {
            if row.is_base_row() {
                assert!(bases.insert(row.id.clone(), row.clone()).is_none());
                continue;
            }
            let base = bases.get(&row.id).expect("satellite follows its base row");
            assert_eq!(
                IssueRow {
                    linked_issue_id: None,
                    link_type: None,
                    watcher: None,
                    ..row.clone()
                },
                *base
            );

            if let Some(target) = &row.linked_issue_id {
                assert!(row.link_type.is_some());
                assert!(row.watcher.is_none());
                assert_ne!(target, &row.id);
                assert!(bases.contains_key(target), "{target} minted before {}", row.id);
            } else {
                let watcher = row.watcher.as_ref().expect("watcher row");
                assert!(users.contains(watcher));
            }
        }
        assert_eq!(bases.len(), 40);
    }

    #[test]
    fn ids_are_unique_and_dates_are_ordered() {
        let users = users();
        let mut ctx = context(&users, 3);
        let mut ids = MintedIds::new();
        let output = IssueGenerator.generate(&mut ctx, &mut ids, 120);

        let distinct: BTreeSet<_> = output.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(distinct.len(), 120);

        for row in output.rows.iter().filter(|row| row.is_base_row()) {
            assert!(row.created_date <= row.start_date);
            assert!(row.start_date <= row.end_date);
            assert!(row.updated_date >= row.created_date);
            assert!(row.updated_date < ctx.reference_date());
            assert!(row.change_request_id.is_none(), "no change requests minted yet");
            assert!(PRIMARY_TEAMS.contains(&row.team.as_str()));
            let (prefix, _) = row.id.split_once('-').expect("prefixed id");
            assert!(prefix == ISSUE_DEFAULT_PREFIX || ISSUE_ALT_PREFIXES.contains(&prefix));
        }
    }

    #[test]
    fn change_request_links_use_minted_ids() {
        let users = users();
        let mut ctx = context(&users, 8);
        let mut ids = MintedIds::new();
        ids.mint(FixtureTable::ChangeRequests, "CR-FS-001");
        let output = IssueGenerator.generate(&mut ctx, &mut ids, 60);

        let linked: Vec<_> = output
            .rows
            .iter()
            .filter_map(|row| row.change_request_id.as_deref())
            .collect();
        assert!(!linked.is_empty());
        assert!(linked.iter().all(|id| *id == "CR-FS-001"));
    }
}
