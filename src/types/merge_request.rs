//! Merge request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BasicUser, Milestone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub project_id: Option<u64>,
    pub title: String,
    pub description: Option<String>,
    pub state: Option<String>,
    pub draft: Option<bool>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub author: Option<BasicUser>,
    #[serde(default)]
    pub assignees: Vec<BasicUser>,
    #[serde(default)]
    pub reviewers: Vec<BasicUser>,
    pub milestone: Option<Milestone>,
    pub merge_status: Option<String>,
    pub detailed_merge_status: Option<String>,
    pub sha: Option<String>,
    pub merge_commit_sha: Option<String>,
    pub squash: Option<bool>,
    pub force_remove_source_branch: Option<bool>,
    pub has_conflicts: Option<bool>,
    pub user_notes_count: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub web_url: Option<String>,
    pub references: Option<Value>,
    pub diff_refs: Option<Value>,
    #[serde(rename = "_links")]
    pub links: Option<Value>,
}
