//! Merge request and merge request comment tools

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::issue::{NOTHING_TO_UPDATE, join_labels};
use super::{first_error, json_result, optimized_list_result, require_text, validate_datetime};
use crate::gitlab::GitLabClient;
use crate::gitlab::issues::{ListNotesOptions, NoteBody};
use crate::gitlab::merge_requests::{
    CreateMergeRequestOptions, ListMergeRequestsOptions, UpdateMergeRequestOptions,
};
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{MergeRequestStateFilter, PageParams, ProjectRef, SortDirection, StateEvent};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMergeRequestParams {
    #[schemars(description = "Project ID or URL-encoded path, e.g. 42 or \"group/project\"")]
    pub project_id: ProjectRef,
    #[schemars(description = "Project-scoped merge request number (IID)")]
    pub merge_request_iid: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListMergeRequestsParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Filter by state (default: all)")]
    pub state: Option<MergeRequestStateFilter>,
    #[schemars(description = "Comma-separated label names")]
    pub labels: Option<String>,
    pub milestone: Option<String>,
    #[schemars(description = "created_by_me, assigned_to_me or all")]
    pub scope: Option<String>,
    pub author_username: Option<String>,
    pub reviewer_username: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    #[schemars(description = "Search in title and description")]
    pub search: Option<String>,
    #[schemars(description = "Only draft (true) or only ready (false) merge requests")]
    pub draft: Option<bool>,
    #[schemars(description = "created_at, updated_at or title")]
    pub order_by: Option<String>,
    pub sort: Option<SortDirection>,
    #[schemars(description = "ISO 8601 datetime, e.g. 2024-01-31T00:00:00Z")]
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMergeRequestCommentsParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub merge_request_iid: u64,
    pub sort: Option<SortDirection>,
    #[schemars(description = "created_at or updated_at")]
    pub order_by: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateMergeRequestParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: Option<String>,
    pub labels: Option<Vec<String>>,
    pub assignee_ids: Option<Vec<u64>>,
    pub reviewer_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
    #[schemars(description = "Delete the source branch once merged")]
    pub remove_source_branch: Option<bool>,
    pub squash: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateMergeRequestParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub merge_request_iid: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_branch: Option<String>,
    #[schemars(description = "Replaces all labels of the merge request")]
    pub labels: Option<Vec<String>>,
    pub assignee_ids: Option<Vec<u64>>,
    pub reviewer_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
    pub state_event: Option<StateEvent>,
    pub remove_source_branch: Option<bool>,
    pub squash: Option<bool>,
}

impl UpdateMergeRequestParams {
    fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.target_branch.is_some()
            || self.labels.is_some()
            || self.assignee_ids.is_some()
            || self.reviewer_ids.is_some()
            || self.milestone_id.is_some()
            || self.state_event.is_some()
            || self.remove_source_branch.is_some()
            || self.squash.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateMergeRequestCommentParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub merge_request_iid: u64,
    #[schemars(description = "Comment text in Markdown")]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateMergeRequestCommentParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub merge_request_iid: u64,
    pub note_id: u64,
    pub body: String,
}

fn merge_request_resource(iid: u64, project: &ProjectRef) -> String {
    format!("merge request {} in project \"{}\"", iid, project)
}

pub async fn get_merge_request(
    client: &GitLabClient,
    params: GetMergeRequestParams,
) -> Result<CallToolResult, McpError> {
    let resource = merge_request_resource(params.merge_request_iid, &params.project_id);
    match client
        .get_merge_request(&params.project_id, params.merge_request_iid)
        .await
    {
        Ok(response) => json_result(&response.data, "merge request"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn list_merge_requests(
    client: &GitLabClient,
    params: ListMergeRequestsParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        params.page.validate(),
        validate_datetime("created_after", params.created_after.as_deref()),
        validate_datetime("created_before", params.created_before.as_deref()),
        validate_datetime("updated_after", params.updated_after.as_deref()),
        validate_datetime("updated_before", params.updated_before.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("merge requests in project \"{}\"", params.project_id);
    let options = ListMergeRequestsOptions {
        state: params.state.map(|state| state.to_string()),
        labels: params.labels,
        milestone: params.milestone,
        scope: params.scope,
        author_username: params.author_username,
        reviewer_username: params.reviewer_username,
        source_branch: params.source_branch,
        target_branch: params.target_branch,
        search: params.search,
        draft: params.draft,
        order_by: params.order_by,
        sort: params.sort.map(|sort| sort.to_string()),
        created_after: params.created_after,
        created_before: params.created_before,
        updated_after: params.updated_after,
        updated_before: params.updated_before,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_merge_requests(&params.project_id, &options).await {
        Ok(response) => optimized_list_result(
            &response.data,
            &response.page_info,
            "merge_request",
            "merge requests",
        ),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn get_merge_request_comments(
    client: &GitLabClient,
    params: GetMergeRequestCommentsParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!(
        "comments of {}",
        merge_request_resource(params.merge_request_iid, &params.project_id)
    );
    let options = ListNotesOptions {
        sort: params.sort.map(|sort| sort.to_string()),
        order_by: params.order_by,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client
        .list_merge_request_notes(&params.project_id, params.merge_request_iid, &options)
        .await
    {
        Ok(response) => optimized_list_result(
            &response.data,
            &response.page_info,
            "note",
            "merge request comments",
        ),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn create_merge_request(
    client: &GitLabClient,
    params: CreateMergeRequestParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        require_text("source_branch", &params.source_branch),
        require_text("target_branch", &params.target_branch),
        require_text("title", &params.title),
    ]) {
        return Ok(validation_error(message));
    }
    if params.source_branch == params.target_branch {
        return Ok(validation_error(
            "source_branch and target_branch must be different",
        ));
    }

    let resource = format!("project \"{}\"", params.project_id);
    let options = CreateMergeRequestOptions {
        source_branch: params.source_branch,
        target_branch: params.target_branch,
        title: params.title,
        description: params.description,
        labels: join_labels(params.labels),
        assignee_ids: params.assignee_ids,
        reviewer_ids: params.reviewer_ids,
        milestone_id: params.milestone_id,
        remove_source_branch: params.remove_source_branch,
        squash: params.squash,
    };

    match client.create_merge_request(&params.project_id, &options).await {
        Ok(response) => json_result(&response.data, "merge request"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "create merge request",
            },
        ),
    }
}

pub async fn update_merge_request(
    client: &GitLabClient,
    params: UpdateMergeRequestParams,
) -> Result<CallToolResult, McpError> {
    if !params.has_updates() {
        return Ok(validation_error(NOTHING_TO_UPDATE));
    }
    let optional_text = |field: &str, value: Option<&str>| {
        value.map_or(Ok(()), |value| require_text(field, value))
    };
    if let Err(message) = first_error([
        optional_text("title", params.title.as_deref()),
        optional_text("target_branch", params.target_branch.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = merge_request_resource(params.merge_request_iid, &params.project_id);
    let options = UpdateMergeRequestOptions {
        title: params.title,
        description: params.description,
        target_branch: params.target_branch,
        labels: join_labels(params.labels),
        assignee_ids: params.assignee_ids,
        reviewer_ids: params.reviewer_ids,
        milestone_id: params.milestone_id,
        state_event: params.state_event.map(|event| event.to_string()),
        remove_source_branch: params.remove_source_branch,
        squash: params.squash,
    };

    match client
        .update_merge_request(&params.project_id, params.merge_request_iid, &options)
        .await
    {
        Ok(response) => json_result(&response.data, "merge request"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "update merge request",
            },
        ),
    }
}

pub async fn create_merge_request_comment(
    client: &GitLabClient,
    params: CreateMergeRequestCommentParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("body", &params.body) {
        return Ok(validation_error(message));
    }

    let resource = merge_request_resource(params.merge_request_iid, &params.project_id);
    let body = NoteBody { body: params.body };

    match client
        .create_merge_request_note(&params.project_id, params.merge_request_iid, &body)
        .await
    {
        Ok(response) => json_result(&response.data, "comment"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "create merge request comment",
            },
        ),
    }
}

pub async fn update_merge_request_comment(
    client: &GitLabClient,
    params: UpdateMergeRequestCommentParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("body", &params.body) {
        return Ok(validation_error(message));
    }

    let resource = format!(
        "note {} of {}",
        params.note_id,
        merge_request_resource(params.merge_request_iid, &params.project_id)
    );
    let body = NoteBody { body: params.body };

    match client
        .update_merge_request_note(
            &params.project_id,
            params.merge_request_iid,
            params.note_id,
            &body,
        )
        .await
    {
        Ok(response) => json_result(&response.data, "comment"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "update merge request comment",
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_merge_request_requires_a_field() {
        let params: UpdateMergeRequestParams =
            serde_json::from_value(json!({ "project_id": "g/app", "merge_request_iid": 7 }))
                .unwrap();
        assert!(!params.has_updates());

        let params: UpdateMergeRequestParams = serde_json::from_value(json!({
            "project_id": "g/app",
            "merge_request_iid": 7,
            "squash": true
        }))
        .unwrap();
        assert!(params.has_updates());
    }

    #[test]
    fn test_unknown_state_filter_is_rejected() {
        let result = serde_json::from_value::<ListMergeRequestsParams>(json!({
            "project_id": 1,
            "state": "draft"
        }));
        assert!(result.is_err());
    }
}
