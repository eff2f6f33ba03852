//! Issue, issue comment and label tools

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{first_error, json_result, list_result, optimized_list_result, require_text, validate_date, validate_datetime};
use crate::gitlab::GitLabClient;
use crate::gitlab::issues::{
    CreateIssueOptions, ListIssuesOptions, ListLabelsOptions, ListNotesOptions, NoteBody,
    UpdateIssueOptions,
};
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{IssueStateFilter, PageParams, ProjectRef, SortDirection, StateEvent};

/// Error text for updates that carry no field to change
pub const NOTHING_TO_UPDATE: &str = "at least one field to update must be provided";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIssueParams {
    #[schemars(description = "Project ID or URL-encoded path, e.g. 42 or \"group/project\"")]
    pub project_id: ProjectRef,
    #[schemars(description = "Project-scoped issue number (IID)")]
    pub issue_iid: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssuesParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Filter by state (default: all)")]
    pub state: Option<IssueStateFilter>,
    #[schemars(description = "Comma-separated label names; 'None' or 'Any' are also accepted")]
    pub labels: Option<String>,
    #[schemars(description = "Milestone title")]
    pub milestone: Option<String>,
    #[schemars(description = "created_by_me, assigned_to_me or all")]
    pub scope: Option<String>,
    pub author_username: Option<String>,
    pub assignee_username: Option<String>,
    #[schemars(description = "Search in title and description")]
    pub search: Option<String>,
    #[schemars(description = "created_at, updated_at, priority, due_date, relative_position, label_priority, milestone_due, popularity or weight")]
    pub order_by: Option<String>,
    pub sort: Option<SortDirection>,
    #[schemars(description = "ISO 8601 datetime, e.g. 2024-01-31T00:00:00Z")]
    pub created_after: Option<String>,
    #[schemars(description = "ISO 8601 datetime")]
    pub created_before: Option<String>,
    #[schemars(description = "ISO 8601 datetime")]
    pub updated_after: Option<String>,
    #[schemars(description = "ISO 8601 datetime")]
    pub updated_before: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIssueCommentsParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Project-scoped issue number (IID)")]
    pub issue_iid: u64,
    pub sort: Option<SortDirection>,
    #[schemars(description = "created_at or updated_at")]
    pub order_by: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIssueLabelsParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Keyword to filter labels by")]
    pub search: Option<String>,
    #[schemars(description = "Include open issue and merge request counts")]
    pub with_counts: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIssueParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub title: String,
    #[schemars(description = "Markdown description")]
    pub description: Option<String>,
    pub labels: Option<Vec<String>>,
    pub assignee_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
    #[schemars(description = "Due date in YYYY-MM-DD format")]
    pub due_date: Option<String>,
    pub confidential: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateIssueParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Project-scoped issue number (IID)")]
    pub issue_iid: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schemars(description = "Replaces all labels of the issue")]
    pub labels: Option<Vec<String>>,
    pub add_labels: Option<Vec<String>>,
    pub remove_labels: Option<Vec<String>>,
    pub assignee_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
    pub state_event: Option<StateEvent>,
    #[schemars(description = "Due date in YYYY-MM-DD format")]
    pub due_date: Option<String>,
    pub confidential: Option<bool>,
}

impl UpdateIssueParams {
    fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.labels.is_some()
            || self.add_labels.is_some()
            || self.remove_labels.is_some()
            || self.assignee_ids.is_some()
            || self.milestone_id.is_some()
            || self.state_event.is_some()
            || self.due_date.is_some()
            || self.confidential.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIssueCommentParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub issue_iid: u64,
    #[schemars(description = "Comment text in Markdown")]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateIssueCommentParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub issue_iid: u64,
    #[schemars(description = "ID of the note to edit")]
    pub note_id: u64,
    pub body: String,
}

/// Joins label names into the comma-separated form GitLab expects.
pub(crate) fn join_labels(labels: Option<Vec<String>>) -> Option<String> {
    labels.map(|labels| labels.join(","))
}

pub async fn get_issue(client: &GitLabClient, params: GetIssueParams) -> Result<CallToolResult, McpError> {
    let resource = format!("issue {} in project \"{}\"", params.issue_iid, params.project_id);
    match client.get_issue(&params.project_id, params.issue_iid).await {
        Ok(response) => json_result(&response.data, "issue"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn list_issues(client: &GitLabClient, params: ListIssuesParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        params.page.validate(),
        validate_datetime("created_after", params.created_after.as_deref()),
        validate_datetime("created_before", params.created_before.as_deref()),
        validate_datetime("updated_after", params.updated_after.as_deref()),
        validate_datetime("updated_before", params.updated_before.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("issues in project \"{}\"", params.project_id);
    let options = ListIssuesOptions {
        state: params.state.map(|state| state.to_string()),
        labels: params.labels,
        milestone: params.milestone,
        scope: params.scope,
        author_username: params.author_username,
        assignee_username: params.assignee_username,
        search: params.search,
        order_by: params.order_by,
        sort: params.sort.map(|sort| sort.to_string()),
        created_after: params.created_after,
        created_before: params.created_before,
        updated_after: params.updated_after,
        updated_before: params.updated_before,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_issues(&params.project_id, &options).await {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "issue", "issues"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn get_issue_comments(
    client: &GitLabClient,
    params: GetIssueCommentsParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!(
        "comments of issue {} in project \"{}\"",
        params.issue_iid, params.project_id
    );
    let options = ListNotesOptions {
        sort: params.sort.map(|sort| sort.to_string()),
        order_by: params.order_by,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client
        .list_issue_notes(&params.project_id, params.issue_iid, &options)
        .await
    {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "note", "issue comments"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn get_issue_labels(
    client: &GitLabClient,
    params: GetIssueLabelsParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!("labels in project \"{}\"", params.project_id);
    let options = ListLabelsOptions {
        search: params.search,
        with_counts: params.with_counts,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_labels(&params.project_id, &options).await {
        Ok(response) => list_result(&response.data, "labels"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn create_issue(client: &GitLabClient, params: CreateIssueParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        require_text("title", &params.title),
        validate_date("due_date", params.due_date.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("project \"{}\"", params.project_id);
    let options = CreateIssueOptions {
        title: params.title,
        description: params.description,
        labels: join_labels(params.labels),
        assignee_ids: params.assignee_ids,
        milestone_id: params.milestone_id,
        due_date: params.due_date,
        confidential: params.confidential,
    };

    match client.create_issue(&params.project_id, &options).await {
        Ok(response) => json_result(&response.data, "issue"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "create issue",
            },
        ),
    }
}

pub async fn update_issue(client: &GitLabClient, params: UpdateIssueParams) -> Result<CallToolResult, McpError> {
    if !params.has_updates() {
        return Ok(validation_error(NOTHING_TO_UPDATE));
    }
    let title_check = params
        .title
        .as_deref()
        .map_or(Ok(()), |title| require_text("title", title));
    if let Err(message) = first_error([
        title_check,
        validate_date("due_date", params.due_date.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("issue {} in project \"{}\"", params.issue_iid, params.project_id);
    let options = UpdateIssueOptions {
        title: params.title,
        description: params.description,
        labels: join_labels(params.labels),
        add_labels: join_labels(params.add_labels),
        remove_labels: join_labels(params.remove_labels),
        assignee_ids: params.assignee_ids,
        milestone_id: params.milestone_id,
        state_event: params.state_event.map(|event| event.to_string()),
        due_date: params.due_date,
        confidential: params.confidential,
    };

    match client
        .update_issue(&params.project_id, params.issue_iid, &options)
        .await
    {
        Ok(response) => json_result(&response.data, "issue"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "update issue",
            },
        ),
    }
}

pub async fn create_issue_comment(
    client: &GitLabClient,
    params: CreateIssueCommentParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("body", &params.body) {
        return Ok(validation_error(message));
    }

    let resource = format!("issue {} in project \"{}\"", params.issue_iid, params.project_id);
    let body = NoteBody { body: params.body };

    match client
        .create_issue_note(&params.project_id, params.issue_iid, &body)
        .await
    {
        Ok(response) => json_result(&response.data, "comment"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "create issue comment",
            },
        ),
    }
}

pub async fn update_issue_comment(
    client: &GitLabClient,
    params: UpdateIssueCommentParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("body", &params.body) {
        return Ok(validation_error(message));
    }

    let resource = format!(
        "note {} of issue {} in project \"{}\"",
        params.note_id, params.issue_iid, params.project_id
    );
    let body = NoteBody { body: params.body };

    match client
        .update_issue_note(&params.project_id, params.issue_iid, params.note_id, &body)
        .await
    {
        Ok(response) => json_result(&response.data, "comment"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "update issue comment",
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_params_accept_flattened_page() {
        let params: ListIssuesParams = serde_json::from_value(json!({
            "project_id": "group/app",
            "state": "opened",
            "page": 2,
            "per_page": 50
        }))
        .unwrap();

        assert_eq!(params.project_id.as_str(), "group/app");
        assert_eq!(params.state, Some(IssueStateFilter::Opened));
        assert_eq!(params.page.page, Some(2));
        assert_eq!(params.page.per_page, Some(50));
    }

    #[test]
    fn test_update_issue_requires_a_field() {
        let params: UpdateIssueParams =
            serde_json::from_value(json!({ "project_id": 1, "issue_iid": 3 })).unwrap();
        assert!(!params.has_updates());

        let params: UpdateIssueParams = serde_json::from_value(json!({
            "project_id": 1,
            "issue_iid": 3,
            "state_event": "close"
        }))
        .unwrap();
        assert!(params.has_updates());
    }

    #[test]
    fn test_join_labels() {
        assert_eq!(
            join_labels(Some(vec!["bug".to_string(), "backend".to_string()])),
            Some("bug,backend".to_string())
        );
        assert_eq!(join_labels(None), None);
    }
}
