//! Issue and note types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BasicUser, Milestone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub iid: u64,
    pub project_id: Option<u64>,
    pub title: String,
    pub description: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub author: Option<BasicUser>,
    #[serde(default)]
    pub assignees: Vec<BasicUser>,
    pub milestone: Option<Milestone>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub due_date: Option<String>,
    pub confidential: Option<bool>,
    pub issue_type: Option<String>,
    pub user_notes_count: Option<u64>,
    pub web_url: Option<String>,
    pub moved_to_id: Option<u64>,
    pub service_desk_reply_to: Option<String>,
    pub epic_issue_id: Option<u64>,
    pub issue_link_id: Option<u64>,
    #[serde(rename = "_links")]
    pub links: Option<Value>,
}

/// Comment attached to an issue or merge request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
    pub author: Option<BasicUser>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub system: Option<bool>,
    pub noteable_id: Option<u64>,
    pub noteable_iid: Option<u64>,
    pub noteable_type: Option<String>,
    pub resolvable: Option<bool>,
    pub resolved: Option<bool>,
    pub confidential: Option<bool>,
    pub internal: Option<bool>,
}
