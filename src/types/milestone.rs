use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub iid: Option<u64>,
    pub project_id: Option<u64>,
    pub group_id: Option<u64>,
    pub title: String,
    pub description: Option<String>,
    pub state: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub expired: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub web_url: Option<String>,
}
