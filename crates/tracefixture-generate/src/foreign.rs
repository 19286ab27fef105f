use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use tracefixture_core::{FixtureTable, IdPool, SemicolonList};

/// Source of identifiers already minted in this run.
pub trait ForeignContext {
    fn ids(&self, table: FixtureTable) -> &IdPool;

    /// One uniformly chosen id of `table`, or `None` when nothing was minted.
    fn pick_reference(&self, table: FixtureTable, rng: &mut dyn RngCore) -> Option<String> {
        self.ids(table).as_slice().choose(rng).cloned()
    }

    /// Up to `max_items` distinct ids of `table`.
    fn sample_references(
        &self,
        table: FixtureTable,
        max_items: usize,
        rng: &mut dyn RngCore,
    ) -> SemicolonList {
        sample_list(self.ids(table).as_slice(), max_items, rng)
    }
}

/// Identifier pools for every table, filled in generation order.
#[derive(Debug, Default)]
pub struct MintedIds {
    issues: IdPool,
    wiki_pages: IdPool,
    change_requests: IdPool,
    change_tasks: IdPool,
    issue_activities: IdPool,
}

impl MintedIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, table: FixtureTable, id: &str) -> bool {
        self.pool_mut(table).mint(id)
    }

    fn pool_mut(&mut self, table: FixtureTable) -> &mut IdPool {
        match table {
            FixtureTable::Issues => &mut self.issues,
            FixtureTable::WikiPages => &mut self.wiki_pages,
            FixtureTable::ChangeRequests => &mut self.change_requests,
            FixtureTable::ChangeTasks => &mut self.change_tasks,
            FixtureTable::IssueActivities => &mut self.issue_activities,
        }
    }
}

impl ForeignContext for MintedIds {
    fn ids(&self, table: FixtureTable) -> &IdPool {
        match table {
            FixtureTable::Issues => &self.issues,
            FixtureTable::WikiPages => &self.wiki_pages,
            FixtureTable::ChangeRequests => &self.change_requests,
            FixtureTable::ChangeTasks => &self.change_tasks,
            FixtureTable::IssueActivities => &self.issue_activities,
        }
    }
}

/// Draw `k` distinct values, `k` uniform in `0..=min(max_items, len)`.
pub fn sample_list<S: AsRef<str>>(
    source: &[S],
    max_items: usize,
    rng: &mut dyn RngCore,
) -> SemicolonList {
    if source.is_empty() {
        return SemicolonList::default();
    }
    let count = rng.random_range(0..=max_items.min(source.len()));
    SemicolonList(
        source
            .choose_multiple(rng, count)
            .map(|value| value.as_ref().to_string())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn empty_pool_yields_no_reference() {
        let ids = MintedIds::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(ids.pick_reference(FixtureTable::ChangeRequests, &mut rng), None);
        assert!(ids
            .sample_references(FixtureTable::ChangeRequests, 2, &mut rng)
            .is_empty());
    }

    #[test]
    fn references_come_from_the_requested_pool() {
        let mut ids = MintedIds::new();
        for id in ["NOVA-001", "BUG-002", "NOVA-003"] {
            assert!(ids.mint(FixtureTable::Issues, id));
        }
        ids.mint(FixtureTable::WikiPages, "CONF-KB-001");

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = ids
                .pick_reference(FixtureTable::Issues, &mut rng)
                .expect("pool not empty");
            assert!(ids.ids(FixtureTable::Issues).contains(&picked));

            let sample = ids.sample_references(FixtureTable::Issues, 4, &mut rng);
            assert!(sample.0.len() <= 3);
            let distinct: BTreeSet<_> = sample.iter().collect();
            assert_eq!(distinct.len(), sample.0.len());
            assert!(sample.iter().all(|id| id.starts_with("NOVA") || id.starts_with("BUG")));
        }
    }
}
