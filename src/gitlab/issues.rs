//! Issues, issue notes and project labels

use serde::Serialize;

use super::client::{ApiResponse, GitLabClient};
use super::error::ApiError;
use crate::types::{Issue, Label, Note, ProjectRef};

/// Query parameters of `GET /projects/:id/issues`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListIssuesOptions {
    pub state: Option<String>,
    pub labels: Option<String>,
    pub milestone: Option<String>,
    pub scope: Option<String>,
    pub author_username: Option<String>,
    pub assignee_username: Option<String>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Query parameters shared by note listings
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListNotesOptions {
    pub sort: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListLabelsOptions {
    pub search: Option<String>,
    pub with_counts: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Body of `POST /projects/:id/issues`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssueOptions {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
}

/// Body of `PUT /projects/:id/issues/:iid`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateIssueOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
}

/// Body of note create/update requests
#[derive(Debug, Clone, Serialize)]
pub struct NoteBody {
    pub body: String,
}

impl GitLabClient {
    pub async fn get_issue(&self, project: &ProjectRef, iid: u64) -> Result<ApiResponse<Issue>, ApiError> {
        let path = format!("/projects/{}/issues/{}", project.encoded(), iid);
        self.get_one(&path).await
    }

    pub async fn list_issues(
        &self,
        project: &ProjectRef,
        options: &ListIssuesOptions,
    ) -> Result<ApiResponse<Vec<Issue>>, ApiError> {
        let path = format!("/projects/{}/issues", project.encoded());
        self.get(&path, options).await
    }

    pub async fn list_issue_notes(
        &self,
        project: &ProjectRef,
        iid: u64,
        options: &ListNotesOptions,
    ) -> Result<ApiResponse<Vec<Note>>, ApiError> {
        let path = format!("/projects/{}/issues/{}/notes", project.encoded(), iid);
        self.get(&path, options).await
    }

    pub async fn list_labels(
        &self,
        project: &ProjectRef,
        options: &ListLabelsOptions,
    ) -> Result<ApiResponse<Vec<Label>>, ApiError> {
        let path = format!("/projects/{}/labels", project.encoded());
        self.get(&path, options).await
    }

    pub async fn create_issue(
        &self,
        project: &ProjectRef,
        options: &CreateIssueOptions,
    ) -> Result<ApiResponse<Issue>, ApiError> {
        let path = format!("/projects/{}/issues", project.encoded());
        self.post(&path, options).await
    }

    pub async fn update_issue(
        &self,
        project: &ProjectRef,
        iid: u64,
        options: &UpdateIssueOptions,
    ) -> Result<ApiResponse<Issue>, ApiError> {
        let path = format!("/projects/{}/issues/{}", project.encoded(), iid);
        self.put(&path, options).await
    }

    pub async fn create_issue_note(
        &self,
        project: &ProjectRef,
        iid: u64,
        body: &NoteBody,
    ) -> Result<ApiResponse<Note>, ApiError> {
        let path = format!("/projects/{}/issues/{}/notes", project.encoded(), iid);
        self.post(&path, body).await
    }

    pub async fn update_issue_note(
        &self,
        project: &ProjectRef,
        iid: u64,
        note_id: u64,
        body: &NoteBody,
    ) -> Result<ApiResponse<Note>, ApiError> {
        let path = format!(
            "/projects/{}/issues/{}/notes/{}",
            project.encoded(),
            iid,
            note_id
        );
        self.put(&path, body).await
    }
}
