use rand::seq::IndexedRandom;

use tracefixture_core::vocab::{TEAMS, WIKI_SPACES, WIKI_SPACE_KEYS};
use tracefixture_core::{FixtureTable, WikiPageRow, generation_window_start, sequence_id};

use crate::dates::{date_between, ymd};
use crate::foreign::{ForeignContext, MintedIds};
use crate::generators::{GeneratorContext, TableGenerator, TableRows};
use crate::text;

const MAX_LINKED_ISSUES: usize = 4;
const MAX_LINKED_CHANGE_REQUESTS: usize = 2;

/// Wiki pages, one row each. A page's parent is always a page minted before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikiPageGenerator;

impl TableGenerator for WikiPageGenerator {
    type Row = WikiPageRow;

    fn table(&self) -> FixtureTable {
        FixtureTable::WikiPages
    }

    fn generate(
        &self,
        ctx: &mut GeneratorContext<'_>,
        ids: &mut MintedIds,
        count: usize,
    ) -> TableRows<WikiPageRow> {
        let mut rows = Vec::with_capacity(count);
        let mut parent_candidates: Vec<String> = Vec::new();

        for ordinal in 1..=count {
            let space_key = ctx.pick(WIKI_SPACE_KEYS);
            let id = sequence_id(&format!("CONF-{space_key}-"), ordinal);
            ids.mint(FixtureTable::WikiPages, &id);

            let parent_page_id = if !parent_candidates.is_empty() && ctx.chance(0.4) {
                parent_candidates.choose(&mut ctx.rng).cloned()
            } else {
                None
            };
            if ctx.chance(0.7) {
                parent_candidates.push(id.clone());
            }

            let created_date =
                date_between(&mut ctx.rng, generation_window_start(), ymd(2024, 5, 1));
            let last_modified_date = date_between(&mut ctx.rng, created_date, ymd(2024, 6, 30));

            rows.push(WikiPageRow {
                title: format!("{} Documentation", text::catch_phrase(&mut ctx.rng)),
                owner: ctx.user(),
                last_edited_by: ctx.user(),
                space: ctx.pick(WIKI_SPACES).to_string(),
                team: ctx.pick(TEAMS).to_string(),
                content_summary: text::paragraph(&mut ctx.rng, 2),
                linked_issue_ids: ids.sample_references(
                    FixtureTable::Issues,
                    MAX_LINKED_ISSUES,
                    &mut ctx.rng,
                ),
                linked_change_request_ids: ids.sample_references(
                    FixtureTable::ChangeRequests,
                    MAX_LINKED_CHANGE_REQUESTS,
                    &mut ctx.rng,
                ),
                parent_page_id,
                created_date,
                last_modified_date,
                id,
            });
        }

        TableRows {
            rows,
            base_rows: count,
        }
    }
}
