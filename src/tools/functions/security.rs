//! Security report tools backed by the GraphQL API

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{list_result, require_text};
use crate::gitlab::GitLabClient;
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::SecurityReportType;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProjectPathParams {
    #[schemars(description = "Full project path, e.g. \"group/subgroup/project\"")]
    pub project_path: String,
}

/// Findings of one scan type from the latest pipeline of the project.
pub async fn get_security_findings(
    client: &GitLabClient,
    params: ProjectPathParams,
    report_type: SecurityReportType,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("project_path", &params.project_path) {
        return Ok(validation_error(message));
    }

    let resource = format!(
        "{} findings for project \"{}\"",
        report_type.label(),
        params.project_path
    );
    match client
        .fetch_security_findings(params.project_path.trim(), report_type)
        .await
    {
        Ok(findings) => list_result(&findings, "security findings"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}

pub async fn get_license_compliance(
    client: &GitLabClient,
    params: ProjectPathParams,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("project_path", &params.project_path) {
        return Ok(validation_error(message));
    }

    let resource = format!("license compliance for project \"{}\"", params.project_path);
    match client
        .fetch_license_compliance(params.project_path.trim())
        .await
    {
        Ok(licenses) => list_result(&licenses, "licenses"),
        Err(e) => classify_api_error(&e, ApiCallKind::Single { resource: &resource }),
    }
}
