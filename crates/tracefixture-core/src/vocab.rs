//! Fixed vocabularies the generators draw field values from.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const TEAMS: &[&str] = &[
    "Team Phoenix",
    "Team Griffin",
    "Team Hydra",
    "Marketing",
    "Cross-functional",
    "Operations",
];

/// Teams that own engineering work; issues are only assigned to these.
pub const PRIMARY_TEAMS: &[&str] = &["Team Phoenix", "Team Griffin", "Team Hydra"];

pub const ISSUE_TYPES: &[&str] = &[
    "Story",
    "Task",
    "Bug",
    "Feature",
    "Epic",
    "Project",
    "Business Outcome",
];

pub const ISSUE_PRIORITIES: &[&str] = &["Minor", "Major", "Critical", "Low", "Medium", "High"];

pub const ISSUE_STATUSES: &[&str] = &[
    "Pending",
    "Development",
    "Review",
    "Release",
    "Closed",
    "Blocked",
    "Open",
    "In Progress",
];

pub const ISSUE_COMPONENTS: &[&str] = &["API", "Mobile UI", "Database", "Auth", "Payments", "NFC"];

pub const ISSUE_LABELS: &[&str] = &[
    "performance",
    "security",
    "sprint-goal",
    "ProjectNova",
    "tech-debt",
    "ux",
];

pub const ISSUE_ALT_PREFIXES: &[&str] = &["LOG", "PERF", "BUG", "FEAT"];
pub const ISSUE_DEFAULT_PREFIX: &str = "NOVA";

pub const SPRINT_STREAMS: &[&str] = &["Nova", "General", "Infra"];

/// Includes an empty entry: some issues name no app even when the field is drawn.
pub const APP_NAMES: &[&str] = &["CoreBankingApp_Wallet", "MobileApp_Global", "AdminPortal", ""];

pub const RELEASE_SUFFIXES: &[&str] = &["-beta", "-RC", "", "-hotfix"];

pub const STORY_POINTS: &[u8] = &[1, 2, 3, 5, 8, 13, 21];

pub const CR_TYPES: &[&str] = &["Standard", "Emergency", "Normal"];

pub const CR_CATEGORIES: &[&str] = &[
    "Enhancement",
    "BugFix",
    "Security",
    "Infrastructure",
    "Deployment",
    "Audit",
    "Maintenance",
    "New Feature",
    "Communication",
];

pub const CR_RISKS: &[&str] = &["Low", "Medium", "High"];

pub const CR_ENVIRONMENTS: &[&str] = &["Production", "Staging", "Development", "N/A"];

pub const CR_DEPARTMENTS: &[&str] = &[
    "Payments",
    "Mobile Banking",
    "Security",
    "Core API",
    "Marketing",
];

pub const CR_CONFLICT_STATUSES: &[&str] = &["No Conflict", "Conflict Detected", "Resolved"];

pub const CR_IMPLEMENTATION_DEFAULT: &str = "Details in Confluence";
pub const CR_BACKOUT_DEFAULT: &str = "Standard rollback";

pub const WIKI_SPACES: &[&str] = &[
    "Project Nova",
    "Team Phoenix KB",
    "Team Griffin Design",
    "Team Hydra Compliance",
    "General Fintech Policies",
];

pub const WIKI_SPACE_KEYS: &[&str] = &["PN", "LOG", "SEC", "ARCH", "KB"];

pub const ACTIVITY_COMMENT_ADDED: &str = "Comment added.";

/// Lifecycle states of a change request, in the order a request moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CrState {
    New,
    Assess,
    Authorise,
    Scheduled,
    Implement,
    Closed,
}

impl CrState {
    pub const ALL: [CrState; 6] = [
        CrState::New,
        CrState::Assess,
        CrState::Authorise,
        CrState::Scheduled,
        CrState::Implement,
        CrState::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CrState::New => "New",
            CrState::Assess => "Assess",
            CrState::Authorise => "Authorise",
            CrState::Scheduled => "Scheduled",
            CrState::Implement => "Implement",
            CrState::Closed => "Closed",
        }
    }

    /// Position in the lifecycle, starting at zero for `New`.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for CrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed relationship between two issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    #[serde(rename = "blocks")]
    Blocks,
    #[serde(rename = "relates to")]
    RelatesTo,
    #[serde(rename = "duplicates")]
    Duplicates,
    #[serde(rename = "sub-task of")]
    SubTaskOf,
    #[serde(rename = "cloned by")]
    ClonedBy,
}

impl LinkType {
    pub const ALL: [LinkType; 5] = [
        LinkType::Blocks,
        LinkType::RelatesTo,
        LinkType::Duplicates,
        LinkType::SubTaskOf,
        LinkType::ClonedBy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Blocks => "blocks",
            LinkType::RelatesTo => "relates to",
            LinkType::Duplicates => "duplicates",
            LinkType::SubTaskOf => "sub-task of",
            LinkType::ClonedBy => "cloned by",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
