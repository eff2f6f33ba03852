//! Projects and repository resources: branches, commits, tags and releases

use serde::Serialize;

use super::client::{ApiResponse, GitLabClient};
use super::error::ApiError;
use crate::types::{Branch, Commit, Project, ProjectRef, Release, Tag};

/// Query parameters of `GET /projects`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProjectsOptions {
    pub search: Option<String>,
    pub owned: Option<bool>,
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub visibility: Option<String>,
    pub archived: Option<bool>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub simple: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListBranchesOptions {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Query parameters of `GET /projects/:id/repository/commits`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCommitsOptions {
    pub ref_name: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub path: Option<String>,
    pub author: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListTagsOptions {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Body of `POST /projects/:id/repository/tags`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTagOptions {
    pub tag_name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GitLabClient {
    pub async fn get_project(&self, project: &ProjectRef) -> Result<ApiResponse<Project>, ApiError> {
        let path = format!("/projects/{}", project.encoded());
        self.get_one(&path).await
    }

    pub async fn list_projects(
        &self,
        options: &ListProjectsOptions,
    ) -> Result<ApiResponse<Vec<Project>>, ApiError> {
        self.get("/projects", options).await
    }

    pub async fn list_branches(
        &self,
        project: &ProjectRef,
        options: &ListBranchesOptions,
    ) -> Result<ApiResponse<Vec<Branch>>, ApiError> {
        let path = format!("/projects/{}/repository/branches", project.encoded());
        self.get(&path, options).await
    }

    pub async fn list_commits(
        &self,
        project: &ProjectRef,
        options: &ListCommitsOptions,
    ) -> Result<ApiResponse<Vec<Commit>>, ApiError> {
        let path = format!("/projects/{}/repository/commits", project.encoded());
        self.get(&path, options).await
    }

    pub async fn list_tags(
        &self,
        project: &ProjectRef,
        options: &ListTagsOptions,
    ) -> Result<ApiResponse<Vec<Tag>>, ApiError> {
        let path = format!("/projects/{}/repository/tags", project.encoded());
        self.get(&path, options).await
    }

    pub async fn get_tag(&self, project: &ProjectRef, tag_name: &str) -> Result<ApiResponse<Tag>, ApiError> {
        let path = format!(
            "/projects/{}/repository/tags/{}",
            project.encoded(),
            urlencoding::encode(tag_name)
        );
        self.get_one(&path).await
    }

    pub async fn create_tag(
        &self,
        project: &ProjectRef,
        options: &CreateTagOptions,
    ) -> Result<ApiResponse<Tag>, ApiError> {
        let path = format!("/projects/{}/repository/tags", project.encoded());
        self.post(&path, options).await
    }

    pub async fn delete_tag(&self, project: &ProjectRef, tag_name: &str) -> Result<ApiResponse<()>, ApiError> {
        let path = format!(
            "/projects/{}/repository/tags/{}",
            project.encoded(),
            urlencoding::encode(tag_name)
        );
        self.delete(&path).await
    }

    /// Release attached to a tag, including the commit it points to
    pub async fn get_release(
        &self,
        project: &ProjectRef,
        tag_name: &str,
    ) -> Result<ApiResponse<Release>, ApiError> {
        let path = format!(
            "/projects/{}/releases/{}",
            project.encoded(),
            urlencoding::encode(tag_name)
        );
        self.get_one(&path).await
    }
}
