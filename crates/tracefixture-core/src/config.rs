use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on any single table's requested count.
pub const MAX_ROWS: usize = 100_000;

/// Upper bound on the user roster size.
pub const MAX_USERS: usize = 1_000;

/// First day of every fixed generation window.
pub fn generation_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

/// Requested number of unique entities per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RowCounts {
    /// Unique issues; link and watcher rows come on top of these.
    pub issues: usize,
    pub wiki_pages: usize,
    /// Unique change requests; each adds one to three status-update rows.
    pub change_requests: usize,
    pub change_tasks: usize,
    pub issue_activities: usize,
}

impl Default for RowCounts {
    fn default() -> Self {
        Self {
            issues: 72,
            wiki_pages: 23,
            change_requests: 22,
            change_tasks: 18,
            issue_activities: 35,
        }
    }
}

/// Fixture generation settings, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FixtureConfig {
    pub counts: RowCounts,
    /// Number of distinct user handles shared by all tables.
    pub users: usize,
    /// Run seed. When absent a seed is drawn from OS entropy and reported.
    pub seed: Option<u64>,
    /// Stand-in for "today"; relative windows (recent tasks and activity) end here.
    pub reference_date: Option<NaiveDate>,
    /// Directory the CSV files are written to.
    pub out_dir: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            counts: RowCounts::default(),
            users: 20,
            seed: None,
            reference_date: None,
            out_dir: PathBuf::from("."),
        }
    }
}

pub fn load_config(path: &Path) -> Result<FixtureConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: FixtureConfig = toml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check the documented bounds of a configuration.
///
/// This checks:
/// - every count is at most [`MAX_ROWS`]
/// - the roster has between 1 and [`MAX_USERS`] users
/// - the reference date falls after the start of the generation windows
pub fn validate_config(config: &FixtureConfig) -> Result<()> {
    let counts = &config.counts;
    for (name, value) in [
        ("issues", counts.issues),
        ("wiki_pages", counts.wiki_pages),
        ("change_requests", counts.change_requests),
        ("change_tasks", counts.change_tasks),
        ("issue_activities", counts.issue_activities),
    ] {
        if value > MAX_ROWS {
            return Err(Error::InvalidConfig(format!(
                "counts.{name} = {value} exceeds the maximum of {MAX_ROWS}"
            )));
        }
    }

    if config.users == 0 || config.users > MAX_USERS {
        return Err(Error::InvalidConfig(format!(
            "users must be between 1 and {MAX_USERS}, got {}",
            config.users
        )));
    }

    if let Some(reference_date) = config.reference_date {
        let start = generation_window_start();
        if reference_date <= start {
            return Err(Error::InvalidConfig(format!(
                "reference_date {reference_date} must be after {start}"
            )));
        }
    }

    Ok(())
}
