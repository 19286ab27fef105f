//! Core contracts for tracefixture.
//!
//! This crate defines the row types of the five fixture tables, the fixed
//! vocabularies they draw from, identifier pools, and the configuration
//! contract shared by the generator, the integrity checker and the CLI.

pub mod config;
pub mod error;
pub mod ids;
pub mod records;
pub mod vocab;

pub use config::{
    FixtureConfig, MAX_ROWS, MAX_USERS, RowCounts, generation_window_start, load_config,
    validate_config,
};
pub use error::{Error, Result};
pub use ids::{IdPool, sequence_id};
pub use records::{
    ChangeRequestRow, ChangeTaskRow, FixtureTable, IssueActivityRow, IssueRow, SemicolonList,
    WikiPageRow,
};
pub use vocab::{CrState, LinkType};

/// Current contract version for `generation_report.json` and `integrity_report.json`.
pub const REPORT_VERSION: &str = "0.1";
