use serde::{Deserialize, Serialize};

/// Project label as returned by `/projects/:id/labels`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub description: Option<String>,
    pub open_issues_count: Option<u64>,
    pub closed_issues_count: Option<u64>,
    pub open_merge_requests_count: Option<u64>,
    pub priority: Option<i64>,
    pub is_project_label: Option<bool>,
}
