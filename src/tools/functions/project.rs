//! Project, branch and commit tools

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{first_error, json_result, list_result, optimized_list_result, validate_datetime};
use crate::gitlab::GitLabClient;
use crate::gitlab::projects::{ListBranchesOptions, ListCommitsOptions, ListProjectsOptions};
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{PageParams, ProjectRef, ProjectVisibility, SortDirection};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetProjectParams {
    #[schemars(description = "Project ID or URL-encoded path, e.g. 42 or \"group/project\"")]
    pub project_id: ProjectRef,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListProjectsParams {
    #[schemars(description = "Search projects by name")]
    pub search: Option<String>,
    #[schemars(description = "Only projects owned by the current user")]
    pub owned: Option<bool>,
    #[schemars(description = "Only projects the current user is a member of")]
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub visibility: Option<ProjectVisibility>,
    pub archived: Option<bool>,
    #[schemars(description = "id, name, path, created_at, updated_at or last_activity_at")]
    pub order_by: Option<String>,
    pub sort: Option<SortDirection>,
    #[schemars(description = "Return only limited fields for each project")]
    pub simple: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListProjectBranchesParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Return branches containing this string")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListProjectCommitsParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Branch, tag or commit SHA (default: the default branch)")]
    pub ref_name: Option<String>,
    #[schemars(description = "Only commits after this ISO 8601 datetime")]
    pub since: Option<String>,
    #[schemars(description = "Only commits before this ISO 8601 datetime")]
    pub until: Option<String>,
    #[schemars(description = "Only commits touching this file path")]
    pub path: Option<String>,
    #[schemars(description = "Commit author name or email")]
    pub author: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

pub async fn get_project(client: &GitLabClient, params: GetProjectParams) -> Result<CallToolResult, McpError> {
    let resource = format!("project \"{}\"", params.project_id);
    match client.get_project(&params.project_id).await {
        Ok(response) => json_result(&response.data, "project"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn list_projects(client: &GitLabClient, params: ListProjectsParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let options = ListProjectsOptions {
        search: params.search,
        owned: params.owned,
        membership: params.membership,
        starred: params.starred,
        visibility: params.visibility.map(|visibility| visibility.to_string()),
        archived: params.archived,
        order_by: params.order_by,
        sort: params.sort.map(|sort| sort.to_string()),
        simple: params.simple,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_projects(&options).await {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "project", "projects"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: "projects" }),
    }
}

pub async fn list_project_branches(
    client: &GitLabClient,
    params: ListProjectBranchesParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!("branches in project \"{}\"", params.project_id);
    let options = ListBranchesOptions {
        search: params.search,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_branches(&params.project_id, &options).await {
        Ok(response) => list_result(&response.data, "branches"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn list_project_commits(
    client: &GitLabClient,
    params: ListProjectCommitsParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        params.page.validate(),
        validate_datetime("since", params.since.as_deref()),
        validate_datetime("until", params.until.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("commits in project \"{}\"", params.project_id);
    let options = ListCommitsOptions {
        ref_name: params.ref_name,
        since: params.since,
        until: params.until,
        path: params.path,
        author: params.author,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_commits(&params.project_id, &options).await {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "commit", "commits"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}
