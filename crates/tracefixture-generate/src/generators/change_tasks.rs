use chrono::Duration;
use rand::Rng;

use tracefixture_core::{ChangeTaskRow, FixtureTable, sequence_id};

use crate::dates::minute_between;
use crate::foreign::{ForeignContext, MintedIds};
use crate::generators::{GeneratorContext, TableGenerator, TableRows};
use crate::text;

const LOOKBACK_DAYS: i64 = 60;

/// Change tasks attached to existing change requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeTaskGenerator;

impl TableGenerator for ChangeTaskGenerator {
    type Row = ChangeTaskRow;

    fn table(&self) -> FixtureTable {
        FixtureTable::ChangeTasks
    }

    fn required_upstream(&self) -> Option<FixtureTable> {
        Some(FixtureTable::ChangeRequests)
    }

    fn generate(
        &self,
        ctx: &mut GeneratorContext<'_>,
        ids: &mut MintedIds,
        count: usize,
    ) -> TableRows<ChangeTaskRow> {
        let mut rows = Vec::with_capacity(count);
        let window_end = ctx.reference_time;
        let window_start = window_end - Duration::days(LOOKBACK_DAYS);

        for ordinal in 1..=count {
            let Some(change_request_id) =
                ids.pick_reference(FixtureTable::ChangeRequests, &mut ctx.rng)
            else {
                break;
            };
            let id = sequence_id("CTASK", ordinal);
            ids.mint(FixtureTable::ChangeTasks, &id);

            let start_time = minute_between(&mut ctx.rng, window_start, window_end);
            let end_time = start_time + Duration::hours(ctx.rng.random_range(2..=48));
            rows.push(ChangeTaskRow {
                id,
                change_request_id,
                assigned_to: ctx.user(),
                start_time,
                end_time,
                description: text::catch_phrase(&mut ctx.rng),
            });
        }

        let base_rows = rows.len();
        TableRows { rows, base_rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{context, users};

    #[test]
    fn tasks_reference_change_requests_within_lookback() {
        let users = users();
        let mut ctx = context(&users, 6);
        let mut ids = MintedIds::new();
        for ordinal in 1..=4 {
            ids.mint(FixtureTable::ChangeRequests, &sequence_id("CR-FS-", ordinal));
        }
        let output = ChangeTaskGenerator.generate(&mut ctx, &mut ids, 18);

        assert_eq!(output.rows.len(), 18);
        assert_eq!(output.rows[0].id, "CTASK001");
        assert_eq!(output.rows[17].id, "CTASK018");
        for row in &output.rows {
            assert!(ids.ids(FixtureTable::ChangeRequests).contains(&row.change_request_id));
            assert!(row.start_time <= ctx.reference_time);
            assert!(row.start_time >= ctx.reference_time - Duration::days(LOOKBACK_DAYS));
            let hours = (row.end_time - row.start_time).num_hours();
            assert!((2..=48).contains(&hours));
        }
    }

    #[test]
    fn no_change_requests_means_no_tasks() {
        let users = users();
        let mut ctx = context(&users, 6);
        let mut ids = MintedIds::new();
        let output = ChangeTaskGenerator.generate(&mut ctx, &mut ids, 5);
        assert!(output.rows.is_empty());
        assert_eq!(
            ChangeTaskGenerator.required_upstream(),
            Some(FixtureTable::ChangeRequests)
        );
    }
}
