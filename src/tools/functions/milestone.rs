//! Project milestone tools

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::issue::NOTHING_TO_UPDATE;
use super::{first_error, json_result, optimized_list_result, require_text, validate_date};
use crate::gitlab::GitLabClient;
use crate::gitlab::milestones::{ListMilestonesOptions, MilestoneOptions};
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{MilestoneStateEvent, MilestoneStateFilter, PageParams, ProjectRef};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMilestoneParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    #[schemars(description = "Milestone ID")]
    pub milestone_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListMilestonesParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub state: Option<MilestoneStateFilter>,
    #[schemars(description = "Exact milestone title")]
    pub title: Option<String>,
    #[schemars(description = "Search in title and description")]
    pub search: Option<String>,
    #[schemars(description = "Include milestones of parent groups")]
    pub include_ancestors: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateMilestoneParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub title: String,
    pub description: Option<String>,
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: Option<String>,
    #[schemars(description = "Due date in YYYY-MM-DD format")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateMilestoneParams {
    #[schemars(description = "Project ID or URL-encoded path")]
    pub project_id: ProjectRef,
    pub milestone_id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: Option<String>,
    #[schemars(description = "Due date in YYYY-MM-DD format")]
    pub due_date: Option<String>,
    pub state_event: Option<MilestoneStateEvent>,
}

fn milestone_resource(milestone_id: u64, project: &ProjectRef) -> String {
    format!("milestone {} in project \"{}\"", milestone_id, project)
}

fn check_dates(start_date: Option<&str>, due_date: Option<&str>) -> Result<(), String> {
    first_error([
        validate_date("start_date", start_date),
        validate_date("due_date", due_date),
    ])?;
    // ISO dates compare correctly as strings
    match (start_date, due_date) {
        (Some(start), Some(due)) if start > due => {
            Err("start_date must not be after due_date".to_string())
        }
        _ => Ok(()),
    }
}

pub async fn get_milestone(client: &GitLabClient, params: GetMilestoneParams) -> Result<CallToolResult, McpError> {
    let resource = milestone_resource(params.milestone_id, &params.project_id);
    match client
        .get_milestone(&params.project_id, params.milestone_id)
        .await
    {
        Ok(response) => json_result(&response.data, "milestone"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn list_milestones(
    client: &GitLabClient,
    params: ListMilestonesParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = params.page.validate() {
        return Ok(validation_error(message));
    }

    let resource = format!("milestones in project \"{}\"", params.project_id);
    let options = ListMilestonesOptions {
        state: params.state.map(|state| state.to_string()),
        title: params.title,
        search: params.search,
        include_ancestors: params.include_ancestors,
        page: params.page.page,
        per_page: params.page.per_page,
    };

    match client.list_milestones(&params.project_id, &options).await {
        Ok(response) => optimized_list_result(&response.data, &response.page_info, "milestone", "milestones"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

pub async fn create_milestone(
    client: &GitLabClient,
    params: CreateMilestoneParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = first_error([
        require_text("title", &params.title),
        check_dates(params.start_date.as_deref(), params.due_date.as_deref()),
    ]) {
        return Ok(validation_error(message));
    }

    let resource = format!("project \"{}\"", params.project_id);
    let options = MilestoneOptions {
        title: Some(params.title),
        description: params.description,
        start_date: params.start_date,
        due_date: params.due_date,
        state_event: None,
    };

    match client.create_milestone(&params.project_id, &options).await {
        Ok(response) => json_result(&response.data, "milestone"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "create milestone",
            },
        ),
    }
}

pub async fn update_milestone(
    client: &GitLabClient,
    params: UpdateMilestoneParams,
) -> Result<CallToolResult, McpError> {
    let has_updates = params.title.is_some()
        || params.description.is_some()
        || params.start_date.is_some()
        || params.due_date.is_some()
        || params.state_event.is_some();
    if !has_updates {
        return Ok(validation_error(NOTHING_TO_UPDATE));
    }
    if let Err(message) = check_dates(params.start_date.as_deref(), params.due_date.as_deref()) {
        return Ok(validation_error(message));
    }

    let resource = milestone_resource(params.milestone_id, &params.project_id);
    let options = MilestoneOptions {
        title: params.title,
        description: params.description,
        start_date: params.start_date,
        due_date: params.due_date,
        state_event: params.state_event.map(|event| event.to_string()),
    };

    match client
        .update_milestone(&params.project_id, params.milestone_id, &options)
        .await
    {
        Ok(response) => json_result(&response.data, "milestone"),
        Err(e) => classify_api_error(
            &e,
            ApiCallKind::Mutation {
                resource: &resource,
                operation: "update milestone",
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dates() {
        assert!(check_dates(None, None).is_ok());
        assert!(check_dates(Some("2024-01-01"), Some("2024-03-31")).is_ok());
        assert!(check_dates(Some("2024-04-01"), Some("2024-03-31")).is_err());
        assert!(check_dates(Some("2024/04/01"), None).is_err());
    }
}
