//! Per-table generators.
//!
//! Each generator mints the ids of its own table into [`MintedIds`] and may
//! only reference ids of tables generated before it.

pub mod change_requests;
pub mod change_tasks;
pub mod issue_activities;
pub mod issues;
pub mod wiki_pages;

use chrono::{NaiveDate, NaiveDateTime};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use tracefixture_core::FixtureTable;

use crate::foreign::MintedIds;

pub use change_requests::ChangeRequestGenerator;
pub use change_tasks::ChangeTaskGenerator;
pub use issue_activities::IssueActivityGenerator;
pub use issues::IssueGenerator;
pub use wiki_pages::WikiPageGenerator;

/// Rows produced for one table.
#[derive(Debug, Clone)]
pub struct TableRows<T> {
    pub rows: Vec<T>,
    /// Rows that introduce a new entity; the rest are satellite rows.
    pub base_rows: usize,
}

pub trait TableGenerator {
    type Row: Serialize;

    fn table(&self) -> FixtureTable;

    /// Table whose ids this generator cannot do without. When that pool is
    /// empty the table is skipped.
    fn required_upstream(&self) -> Option<FixtureTable> {
        None
    }

    fn generate(
        &self,
        ctx: &mut GeneratorContext<'_>,
        ids: &mut MintedIds,
        count: usize,
    ) -> TableRows<Self::Row>;
}

/// Per-table randomness plus the run-wide values every generator shares.
pub struct GeneratorContext<'a> {
    pub users: &'a [String],
    pub reference_time: NaiveDateTime,
    pub rng: ChaCha8Rng,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(users: &'a [String], reference_time: NaiveDateTime, seed: u64) -> Self {
        Self {
            users,
            reference_time,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_time.date()
    }

    pub fn user(&mut self) -> String {
        self.users.choose(&mut self.rng).cloned().unwrap_or_default()
    }

    pub fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values.choose(&mut self.rng).copied().unwrap_or_default()
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability)
    }
}
