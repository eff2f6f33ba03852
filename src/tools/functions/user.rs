//! User tools

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{json_result, optimized_list_result};
use crate::gitlab::GitLabClient;
use crate::gitlab::users::ListUsersOptions;
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{PageParams, ProjectRef};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserIdParams {
    #[schemars(description = "Numeric user ID")]
    pub user_id: u64,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListUsersParams {
    #[schemars(description = "Search by name, username or public email")]
    pub search: Option<String>,
    #[schemars(description = "Exact username")]
    pub username: Option<String>,
    #[schemars(description = "Only active users")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListProjectUsersParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Search by name or username")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

pub async fn get_current_user(client: &GitLabClient) -> Result<CallToolResult, McpError> {
    match client.current_user().await {
        Ok(response) => json_result(&response.data, "user"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: "current user" }),
    }
}

pub async fn get_user(client: &GitLabClient, params: UserIdParams) -> Result<CallToolResult, McpError> {
    let resource = format!("user {}", params.user_id);
    match client.get_user(params.user_id).await {
        Ok(response) => json_result(&response.data, "user"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn get_user_status(client: &GitLabClient, params: UserIdParams) -> Result<CallToolResult, McpError> {
    let resource = format!("status of user {}", params.user_id);
    match client.get_user_status(params.user_id).await {
        Ok(response) => json_result(&response.data, "user status"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn list_users(client: &GitLabClient, params: ListUsersParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let options = ListUsersOptions {
        search: params.search,
        username: params.username,
        active: params.active,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_users(&options).await {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "user", "users"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: "users" }),
    }
}

pub async fn list_project_users(
    client: &GitLabClient,
    params: ListProjectUsersParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!("users of project \"{}\"", params.project_id);
    let options = ListUsersOptions {
        search: params.search,
        page: params.page.page,
        per_page: params.page.per_page,
        ..Default::default()
    };

    match client.list_project_users(&params.project_id, &options).await {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "user", "project users"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}
