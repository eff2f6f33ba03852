use serde::Serialize;

use super::client::{ApiResponse, GitLabClient};
use super::error::ApiError;
use crate::types::{ProjectRef, ProjectUser, User, UserStatus};

/// Query parameters of `GET /users` and `GET /projects/:id/users`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersOptions {
    pub search: Option<String>,
    pub username: Option<String>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl GitLabClient {
    /// User owning the configured token
    pub async fn current_user(&self) -> Result<ApiResponse<User>, ApiError> {
        self.get_one("/user").await
    }

    pub async fn get_user(&self, user_id: u64) -> Result<ApiResponse<User>, ApiError> {
        self.get_one(&format!("/users/{}", user_id)).await
    }

    pub async fn get_user_status(&self, user_id: u64) -> Result<ApiResponse<UserStatus>, ApiError> {
        self.get_one(&format!("/users/{}/status", user_id)).await
    }

    pub async fn list_users(&self, options: &ListUsersOptions) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.get("/users", options).await
    }

    pub async fn list_project_users(
        &self,
        project: &ProjectRef,
        options: &ListUsersOptions,
    ) -> Result<ApiResponse<Vec<ProjectUser>>, ApiError> {
        let path = format!("/projects/{}/users", project.encoded());
        self.get(&path, options).await
    }
}
