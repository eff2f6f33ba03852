//! Merge requests and merge request notes

use serde::Serialize;

use super::client::{ApiResponse, GitLabClient};
use super::error::ApiError;
use super::issues::{ListNotesOptions, NoteBody};
use crate::types::{MergeRequest, Note, ProjectRef};

/// Query parameters of `GET /projects/:id/merge_requests`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListMergeRequestsOptions {
    pub state: Option<String>,
    pub labels: Option<String>,
    pub milestone: Option<String>,
    pub scope: Option<String>,
    pub author_username: Option<String>,
    pub reviewer_username: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub search: Option<String>,
    pub draft: Option<bool>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Body of `POST /projects/:id/merge_requests`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMergeRequestOptions {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
}

/// Body of `PUT /projects/:id/merge_requests/:iid`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateMergeRequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
}

impl GitLabClient {
    pub async fn get_merge_request(
        &self,
        project: &ProjectRef,
        iid: u64,
    ) -> Result<ApiResponse<MergeRequest>, ApiError> {
        let path = format!("/projects/{}/merge_requests/{}", project.encoded(), iid);
        self.get_one(&path).await
    }

    pub async fn list_merge_requests(
        &self,
        project: &ProjectRef,
        options: &ListMergeRequestsOptions,
    ) -> Result<ApiResponse<Vec<MergeRequest>>, ApiError> {
        let path = format!("/projects/{}/merge_requests", project.encoded());
        self.get(&path, options).await
    }

    pub async fn list_merge_request_notes(
        &self,
        project: &ProjectRef,
        iid: u64,
        options: &ListNotesOptions,
    ) -> Result<ApiResponse<Vec<Note>>, ApiError> {
        let path = format!("/projects/{}/merge_requests/{}/notes", project.encoded(), iid);
        self.get(&path, options).await
    }

    pub async fn create_merge_request(
        &self,
        project: &ProjectRef,
        options: &CreateMergeRequestOptions,
    ) -> Result<ApiResponse<MergeRequest>, ApiError> {
        let path = format!("/projects/{}/merge_requests", project.encoded());
        self.post(&path, options).await
    }

    pub async fn update_merge_request(
        &self,
        project: &ProjectRef,
        iid: u64,
        options: &UpdateMergeRequestOptions,
    ) -> Result<ApiResponse<MergeRequest>, ApiError> {
        let path = format!("/projects/{}/merge_requests/{}", project.encoded(), iid);
        self.put(&path, options).await
    }

    pub async fn create_merge_request_note(
        &self,
        project: &ProjectRef,
        iid: u64,
        body: &NoteBody,
    ) -> Result<ApiResponse<Note>, ApiError> {
        let path = format!("/projects/{}/merge_requests/{}/notes", project.encoded(), iid);
        self.post(&path, body).await
    }

    pub async fn update_merge_request_note(
        &self,
        project: &ProjectRef,
        iid: u64,
        note_id: u64,
        body: &NoteBody,
    ) -> Result<ApiResponse<Note>, ApiError> {
        let path = format!(
            "/projects/{}/merge_requests/{}/notes/{}",
            project.encoded(),
            iid,
            note_id
        );
        self.put(&path, body).await
    }
}
