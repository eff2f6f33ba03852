//! Repository tag tools

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use super::{first_error, json_result, list_result, require_text};
use crate::gitlab::GitLabClient;
use crate::gitlab::projects::{CreateTagOptions, ListTagsOptions};
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{PageParams, ProjectRef, SortDirection};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListRepositoryTagsParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Return tags matching this string; ^term and term$ anchor the match")]
    pub search: Option<String>,
    #[schemars(description = "name, updated or version")]
    pub order_by: Option<String>,
    pub sort: Option<SortDirection>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// Identifies one tag of a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TagParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Tag name, e.g. v1.2.0")]
    pub tag_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateRepositoryTagParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub tag_name: String,
    #[serde(rename = "ref")]
    #[schemars(description = "Branch name or commit SHA to tag")]
    pub git_ref: String,
    #[schemars(description = "Message for an annotated tag")]
    pub message: Option<String>,
}

fn tag_resource(tag_name: &str, project: &ProjectRef) -> String {
    format!("tag \"{}\" in project \"{}\"", tag_name, project)
}

pub async fn list_repository_tags(
    client: &GitLabClient,
    params: ListRepositoryTagsParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!("tags in project \"{}\"", params.project_id);
    let options = ListTagsOptions {
        search: params.search,
        order_by: params.order_by,
        sort: params.sort.map(|sort| sort.to_string()),
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_tags(&params.project_id, &options).await {
        Ok(response) => list_result(&response.data, "tags"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn get_repository_tag(client: &GitLabClient, params: TagParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("tag_name", &params.tag_name) {
        return Ok(validation_error(message));
    }

    let resource = tag_resource(&params.tag_name, &params.project_id);
    match client.get_tag(&params.project_id, &params.tag_name).await {
        Ok(response) => json_result(&response.data, "tag"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

/// Fetches the release of a tag, which carries the tagged commit.
pub async fn get_tag_commit(client: &GitLabClient, params: TagParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("tag_name", &params.tag_name) {
        return Ok(validation_error(message));
    }

    let resource = format!(
        "release for tag \"{}\" in project \"{}\"",
        params.tag_name, params.project_id
    );
    match client.get_release(&params.project_id, &params.tag_name).await {
        Ok(response) => json_result(&response.data, "release"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn create_repository_tag(
    client: &GitLabClient,
    params: CreateRepositoryTagParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        require_text("tag_name", &params.tag_name),
        require_text("ref", &params.git_ref),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("project \"{}\"", params.project_id);
    let options = CreateTagOptions {
        tag_name: params.tag_name,
        git_ref: params.git_ref,
        message: params.message,
    };

    match client.create_tag(&params.project_id, &options).await {
        Ok(response) => json_result(&response.data, "tag"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "create tag",
            },
        ),
    }
}

pub async fn delete_repository_tag(client: &GitLabClient, params: TagParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("tag_name", &params.tag_name) {
        return Ok(validation_error(message));
    }

    let resource = tag_resource(&params.tag_name, &params.project_id);
    match client.delete_tag(&params.project_id, &params.tag_name).await {
        Ok(_) => json_result(&deleted_message(&params.tag_name, &params.project_id), "delete confirmation"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

fn deleted_message(tag_name: &str, project: &ProjectRef) -> serde_json::Value {
    json!({
        "message": format!(
            "Tag \"{}\" successfully deleted from project \"{}\"",
            tag_name, project
        )
    })
}
