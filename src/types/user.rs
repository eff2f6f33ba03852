//! GitLab user types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compact user representation embedded in issues, merge requests and notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub state: Option<String>,
    pub avatar_url: Option<String>,
    pub web_url: Option<String>,
}

/// Full user profile as returned by `/users/:id` and `/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub state: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub public_email: Option<String>,
    pub job_title: Option<String>,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub web_url: Option<String>,
    pub website_url: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub skype: Option<String>,
    pub is_admin: Option<bool>,
    pub bot: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_activity_on: Option<String>,
}

/// Project member entry returned by `/projects/:id/users`
pub type ProjectUser = BasicUser;

/// Status message a user sets on their profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatus {
    pub emoji: Option<String>,
    pub availability: Option<String>,
    pub message: Option<String>,
    pub message_html: Option<String>,
    pub clear_status_at: Option<DateTime<Utc>>,
}
