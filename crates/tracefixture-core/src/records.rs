//! Row types for the five fixture tables.
//!
//! Field order is the column order of the written CSV; the serde names are the
//! fixed headers.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::vocab::{CrState, LinkType};

/// The five output tables, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureTable {
    Issues,
    WikiPages,
    ChangeRequests,
    ChangeTasks,
    IssueActivities,
}

impl FixtureTable {
    pub const GENERATION_ORDER: [FixtureTable; 5] = [
        FixtureTable::Issues,
        FixtureTable::WikiPages,
        FixtureTable::ChangeRequests,
        FixtureTable::ChangeTasks,
        FixtureTable::IssueActivities,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FixtureTable::Issues => "issues",
            FixtureTable::WikiPages => "wiki_pages",
            FixtureTable::ChangeRequests => "change_requests",
            FixtureTable::ChangeTasks => "change_tasks",
            FixtureTable::IssueActivities => "issue_activities",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            FixtureTable::Issues => "JIRA_Issues_Detailed.csv",
            FixtureTable::WikiPages => "Confluence_Pages_Detailed.csv",
            FixtureTable::ChangeRequests => "CR_Main.csv",
            FixtureTable::ChangeTasks => "CR_CTasks.csv",
            FixtureTable::IssueActivities => "JIRA_Activities.csv",
        }
    }

    pub fn header(self) -> &'static [&'static str] {
        match self {
            FixtureTable::Issues => ISSUE_HEADER,
            FixtureTable::WikiPages => WIKI_PAGE_HEADER,
            FixtureTable::ChangeRequests => CHANGE_REQUEST_HEADER,
            FixtureTable::ChangeTasks => CHANGE_TASK_HEADER,
            FixtureTable::IssueActivities => ISSUE_ACTIVITY_HEADER,
        }
    }

    /// Tables whose ids this table references.
    pub fn upstream(self) -> &'static [FixtureTable] {
        match self {
            FixtureTable::Issues => &[],
            FixtureTable::WikiPages => &[FixtureTable::Issues],
            FixtureTable::ChangeRequests => &[FixtureTable::Issues, FixtureTable::WikiPages],
            FixtureTable::ChangeTasks => &[FixtureTable::ChangeRequests],
            FixtureTable::IssueActivities => &[FixtureTable::Issues],
        }
    }
}

impl fmt::Display for FixtureTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ISSUE_HEADER: &[&str] = &[
    "JIRA_ID",
    "JIRA_Type",
    "JIRA_Priority",
    "JIRA_Components",
    "JIRA_Labels",
    "JIRA_Sprint",
    "JIRA_App_Name",
    "JIRA_Reporter",
    "JIRA_Assignee",
    "JIRA_Start_Date",
    "JIRA_End_Date",
    "JIRA_Status",
    "JIRA_Title",
    "JIRA_Description",
    "JIRA_Release_Fix_Version",
    "JIRA_Team",
    "JIRA_Confidence",
    "JIRA_Created_Date",
    "JIRA_Updated_Date",
    "JIRA_Effort_Story_Points",
    "CR_ID_Link_From_CSV_Example",
    "JIRA_Linked_Issue_ID_Target",
    "JIRA_Link_Type",
    "JIRA_Watcher_User",
];

pub const WIKI_PAGE_HEADER: &[&str] = &[
    "Confluence_ID",
    "Confluence_Title",
    "Confluence_Owner_Member",
    "Confluence_Last_Edited_By",
    "Confluence_Space",
    "Confluence_Team_Association",
    "Confluence_Content_Summary",
    "Confluence_Linked_Jira_ID",
    "Confluence_Linked_CR_ID",
    "Confluence_Parent_Page_ID",
    "Confluence_Created_Date",
    "Confluence_Last_Modified_Date",
];

pub const CHANGE_REQUEST_HEADER: &[&str] = &[
    "CR_ID",
    "CR_Title",
    "Linked_Jira_ID",
    "Linked_Confluence_ID",
    "CR_State",
    "CR_Requested_By",
    "CR_Team_Assignment_Group",
    "CR_Assigned_To_User",
    "CR_Impacted_Environment",
    "CR_Impacted_Departments",
    "CR_Type",
    "CR_Category",
    "CR_Risk",
    "CR_Risk_Percentage",
    "CR_Lead_Time_Days",
    "CR_Conflict_Status",
    "CR_Description",
    "CR_Start_Date",
    "CR_End_Date",
    "CR_Implementation_Plan_Summary",
    "CR_Backout_Plan_Summary",
    "CR_Updated_By_User_From_CSV_Example",
    "CR_Created_At_From_CSV_Example",
];

pub const CHANGE_TASK_HEADER: &[&str] = &[
    "CTASK_ID",
    "CR_ID",
    "CTASK_Assigned_To_User",
    "CTASK_Start_Time",
    "CTASK_End_Time",
    "CTASK_Description",
];

pub const ISSUE_ACTIVITY_HEADER: &[&str] = &[
    "Activity_ID",
    "JIRA_ID",
    "Activity_Comment",
    "Activity_Timestamp",
    "Activity_User",
];

/// Multi-valued reference field written as a single `;`-joined cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemicolonList(pub Vec<String>);

impl SemicolonList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for SemicolonList {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl Serialize for SemicolonList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(";"))
    }
}

impl<'de> Deserialize<'de> for SemicolonList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self(
            raw.split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

/// `%Y-%m-%d %H:%M` timestamps used by task and activity rows.
pub mod minute_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One row of `JIRA_Issues_Detailed.csv`.
///
/// Every issue has exactly one base row (link and watcher columns empty);
/// each link and each watcher adds a row that repeats the base columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRow {
    #[serde(rename = "JIRA_ID")]
    pub id: String,
    #[serde(rename = "JIRA_Type")]
    pub issue_type: String,
    #[serde(rename = "JIRA_Priority")]
    pub priority: String,
    #[serde(rename = "JIRA_Components")]
    pub components: SemicolonList,
    #[serde(rename = "JIRA_Labels")]
    pub labels: SemicolonList,
    #[serde(rename = "JIRA_Sprint")]
    pub sprint: String,
    #[serde(rename = "JIRA_App_Name")]
    pub app_name: Option<String>,
    #[serde(rename = "JIRA_Reporter")]
    pub reporter: String,
    #[serde(rename = "JIRA_Assignee")]
    pub assignee: String,
    #[serde(rename = "JIRA_Start_Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "JIRA_End_Date")]
    pub end_date: NaiveDate,
    #[serde(rename = "JIRA_Status")]
    pub status: String,
    #[serde(rename = "JIRA_Title")]
    pub title: String,
    #[serde(rename = "JIRA_Description")]
    pub description: String,
    #[serde(rename = "JIRA_Release_Fix_Version")]
    pub fix_version: String,
    #[serde(rename = "JIRA_Team")]
    pub team: String,
    #[serde(rename = "JIRA_Confidence")]
    pub confidence: Option<u8>,
    #[serde(rename = "JIRA_Created_Date")]
    pub created_date: NaiveDate,
    #[serde(rename = "JIRA_Updated_Date")]
    pub updated_date: NaiveDate,
    #[serde(rename = "JIRA_Effort_Story_Points")]
    pub story_points: Option<u8>,
    #[serde(rename = "CR_ID_Link_From_CSV_Example")]
    pub change_request_id: Option<String>,
    #[serde(rename = "JIRA_Linked_Issue_ID_Target")]
    pub linked_issue_id: Option<String>,
    #[serde(rename = "JIRA_Link_Type")]
    pub link_type: Option<LinkType>,
    #[serde(rename = "JIRA_Watcher_User")]
    pub watcher: Option<String>,
}

impl IssueRow {
    pub fn is_base_row(&self) -> bool {
        self.linked_issue_id.is_none() && self.link_type.is_none() && self.watcher.is_none()
    }

    /// Copy of this row carrying a typed link to `target`.
    pub fn with_link(&self, target: &str, link_type: LinkType) -> Self {
        Self {
            linked_issue_id: Some(target.to_string()),
            link_type: Some(link_type),
            watcher: None,
            ..self.clone()
        }
    }

    /// Copy of this row carrying a single watcher.
    pub fn with_watcher(&self, user: &str) -> Self {
        Self {
            linked_issue_id: None,
            link_type: None,
            watcher: Some(user.to_string()),
            ..self.clone()
        }
    }
}

/// One row of `Confluence_Pages_Detailed.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiPageRow {
    #[serde(rename = "Confluence_ID")]
    pub id: String,
    #[serde(rename = "Confluence_Title")]
    pub title: String,
    #[serde(rename = "Confluence_Owner_Member")]
    pub owner: String,
    #[serde(rename = "Confluence_Last_Edited_By")]
    pub last_edited_by: String,
    #[serde(rename = "Confluence_Space")]
    pub space: String,
    #[serde(rename = "Confluence_Team_Association")]
    pub team: String,
    #[serde(rename = "Confluence_Content_Summary")]
    pub content_summary: String,
    #[serde(rename = "Confluence_Linked_Jira_ID")]
    pub linked_issue_ids: SemicolonList,
    #[serde(rename = "Confluence_Linked_CR_ID")]
    pub linked_change_request_ids: SemicolonList,
    #[serde(rename = "Confluence_Parent_Page_ID")]
    pub parent_page_id: Option<String>,
    #[serde(rename = "Confluence_Created_Date")]
    pub created_date: NaiveDate,
    #[serde(rename = "Confluence_Last_Modified_Date")]
    pub last_modified_date: NaiveDate,
}

/// One status-update row of `CR_Main.csv`.
///
/// A change request contributes one row per status update; all columns except
/// state, end date, updated-by and created-at are shared by those rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequestRow {
    #[serde(rename = "CR_ID")]
    pub id: String,
    #[serde(rename = "CR_Title")]
    pub title: String,
    #[serde(rename = "Linked_Jira_ID")]
    pub linked_issue_id: Option<String>,
    #[serde(rename = "Linked_Confluence_ID")]
    pub linked_page_id: Option<String>,
    #[serde(rename = "CR_State")]
    pub state: CrState,
    #[serde(rename = "CR_Requested_By")]
    pub requested_by: String,
    #[serde(rename = "CR_Team_Assignment_Group")]
    pub team: String,
    #[serde(rename = "CR_Assigned_To_User")]
    pub assigned_to: String,
    #[serde(rename = "CR_Impacted_Environment")]
    pub environment: String,
    #[serde(rename = "CR_Impacted_Departments")]
    pub departments: SemicolonList,
    #[serde(rename = "CR_Type")]
    pub cr_type: String,
    #[serde(rename = "CR_Category")]
    pub category: String,
    #[serde(rename = "CR_Risk")]
    pub risk: String,
    #[serde(rename = "CR_Risk_Percentage")]
    pub risk_percentage: Option<u8>,
    #[serde(rename = "CR_Lead_Time_Days")]
    pub lead_time_days: u8,
    #[serde(rename = "CR_Conflict_Status")]
    pub conflict_status: String,
    #[serde(rename = "CR_Description")]
    pub description: String,
    #[serde(rename = "CR_Start_Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "CR_End_Date")]
    pub end_date: NaiveDate,
    #[serde(rename = "CR_Implementation_Plan_Summary")]
    pub implementation_plan: String,
    #[serde(rename = "CR_Backout_Plan_Summary")]
    pub backout_plan: String,
    #[serde(rename = "CR_Updated_By_User_From_CSV_Example")]
    pub updated_by: String,
    #[serde(rename = "CR_Created_At_From_CSV_Example")]
    pub created_at: NaiveDate,
}

/// One row of `CR_CTasks.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeTaskRow {
    #[serde(rename = "CTASK_ID")]
    pub id: String,
    #[serde(rename = "CR_ID")]
    pub change_request_id: String,
    #[serde(rename = "CTASK_Assigned_To_User")]
    pub assigned_to: String,
    #[serde(rename = "CTASK_Start_Time", with = "minute_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "CTASK_End_Time", with = "minute_timestamp")]
    pub end_time: NaiveDateTime,
    #[serde(rename = "CTASK_Description")]
    pub description: String,
}

/// One row of `JIRA_Activities.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueActivityRow {
    #[serde(rename = "Activity_ID")]
    pub id: String,
    #[serde(rename = "JIRA_ID")]
    pub issue_id: String,
    #[serde(rename = "Activity_Comment")]
    pub comment: String,
    #[serde(rename = "Activity_Timestamp", with = "minute_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Activity_User")]
    pub user: String,
}
