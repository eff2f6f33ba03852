use serde::Serialize;

use super::client::{ApiResponse, GitLabClient};
use super::error::ApiError;
use crate::types::{Milestone, ProjectRef};

/// Query parameters of `GET /projects/:id/milestones`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListMilestonesOptions {
    pub state: Option<String>,
    pub title: Option<String>,
    pub search: Option<String>,
    pub include_ancestors: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Body of milestone create/update requests
#[derive(Debug, Clone, Default, Serialize)]
pub struct MilestoneOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
}

impl GitLabClient {
    pub async fn get_milestone(
        &self,
        project: &ProjectRef,
        milestone_id: u64,
    ) -> Result<ApiResponse<Milestone>, ApiError> {
        let path = format!("/projects/{}/milestones/{}", project.encoded(), milestone_id);
        self.get_one(&path).await
    }

    pub async fn list_milestones(
        &self,
        project: &ProjectRef,
        options: &ListMilestonesOptions,
    ) -> Result<ApiResponse<Vec<Milestone>>, ApiError> {
        let path = format!("/projects/{}/milestones", project.encoded());
        self.get(&path, options).await
    }

    pub async fn create_milestone(
        &self,
        project: &ProjectRef,
        options: &MilestoneOptions,
    ) -> Result<ApiResponse<Milestone>, ApiError> {
        let path = format!("/projects/{}/milestones", project.encoded());
        self.post(&path, options).await
    }

    pub async fn update_milestone(
        &self,
        project: &ProjectRef,
        milestone_id: u64,
        options: &MilestoneOptions,
    ) -> Result<ApiResponse<Milestone>, ApiError> {
        let path = format!("/projects/{}/milestones/{}", project.encoded(), milestone_id);
        self.put(&path, options).await
    }
}
