use chrono::Duration;
use rand::Rng;

use tracefixture_core::vocab::{ACTIVITY_COMMENT_ADDED, ISSUE_STATUSES};
use tracefixture_core::{FixtureTable, IssueActivityRow, sequence_id};

use crate::dates::minute_between;
use crate::foreign::{ForeignContext, MintedIds};
use crate::generators::{GeneratorContext, TableGenerator, TableRows};
use crate::text;

const LOOKBACK_DAYS: i64 = 90;

/// Comment and status-change activity on existing issues.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueActivityGenerator;

impl TableGenerator for IssueActivityGenerator {
    type Row = IssueActivityRow;

    fn table(&self) -> FixtureTable {
        FixtureTable::IssueActivities
    }

    fn required_upstream(&self) -> Option<FixtureTable> {
        Some(FixtureTable::Issues)
    }

    fn generate(
        &self,
        ctx: &mut GeneratorContext<'_>,
        ids: &mut MintedIds,
        count: usize,
    ) -> TableRows<IssueActivityRow> {
        let mut rows = Vec::with_capacity(count);
        let window_end = ctx.reference_time;
        let window_start = window_end - Duration::days(LOOKBACK_DAYS);

        for ordinal in 1..=count {
            let Some(issue_id) = ids.pick_reference(FixtureTable::Issues, &mut ctx.rng) else {
                break;
            };
            let id = sequence_id("ACT", ordinal);
            ids.mint(FixtureTable::IssueActivities, &id);

            let comment = match ctx.rng.random_range(0..3) {
                0 => text::sentence(&mut ctx.rng, 7),
                1 => format!("Status changed to {}", ctx.pick(ISSUE_STATUSES)),
                _ => ACTIVITY_COMMENT_ADDED.to_string(),
            };
            rows.push(IssueActivityRow {
                id,
                issue_id,
                comment,
                timestamp: minute_between(&mut ctx.rng, window_start, window_end),
                user: ctx.user(),
            });
        }

        let base_rows = rows.len();
        TableRows { rows, base_rows }
    }
}
