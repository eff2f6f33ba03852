//! Classification of GitLab API failures into tool results
//!
//! Routine upstream failures (expired token, unknown ID, rejected input) become a
//! normal tool result the agent can read and act on. Anything else escalates as an
//! MCP internal error.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};

use crate::gitlab::ApiError;

/// Message returned for 401 responses
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed (401). Your GitLab token may be expired. Please re-issue a token and update the server configuration.";

/// Calling convention of the failed API call
#[derive(Debug, Clone, Copy)]
pub enum ApiCallKind<'a> {
    /// Fetch or delete of one resource
    Single { resource: &'a str },
    /// Listing; 404 is not treated as "not found"
    List { resource: &'a str },
    /// Create or update; messages name the operation
    Mutation {
        resource: &'a str,
        operation: &'a str,
    },
}

/// Turns an API error into either a user-facing tool result (`Ok`) or an
/// escalated internal error (`Err`).
///
/// A missing status code (network or decode failure) is treated as 500.
pub fn classify_api_error(error: &ApiError, kind: ApiCallKind<'_>) -> Result<CallToolResult, McpError> {
    let status = error.status().unwrap_or(500);

    let recovered = match (status, kind) {
        (401, _) => Some(AUTHENTICATION_FAILED_MESSAGE.to_string()),
        (404, ApiCallKind::Single { resource } | ApiCallKind::Mutation { resource, .. }) => {
            Some(format!("{} not found or access denied ({})", resource, status))
        }
        (400 | 422, ApiCallKind::Single { resource }) => Some(format!(
            "failed to process {}: {} (status: {})",
            resource, error, status
        )),
        (400 | 422, ApiCallKind::Mutation { operation, .. }) => Some(format!(
            "failed to {}: {} (status: {})",
            operation, error, status
        )),
        _ => None,
    };

    if let Some(message) = recovered {
        tracing::warn!("GitLab API call failed with status {}: {}", status, message);
        return Ok(tool_error_result(message));
    }

    let message = match kind {
        ApiCallKind::Single { resource } => {
            format!("failed to process {}: {} (status: {})", resource, error, status)
        }
        ApiCallKind::List { resource } => {
            format!("failed to list {}: {} (status: {})", resource, error, status)
        }
        ApiCallKind::Mutation {
            resource,
            operation,
        } => format!(
            "failed to {} {}: {} (status: {})",
            operation, resource, error, status
        ),
    };
    tracing::error!("{}", message);
    Err(McpError::internal_error(message, None))
}

/// Tool result flagged as an error, carrying a message for the caller
pub fn tool_error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// Tool result for invalid or missing arguments
pub fn validation_error(message: impl std::fmt::Display) -> CallToolResult {
    tool_error_result(format!("Validation Error: {}", message))
}

/// Internal error for responses that could not be serialized
pub fn serialization_error(what: &str, error: serde_json::Error) -> McpError {
    McpError::internal_error(format!("failed to marshal {}: {}", what, error), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Method, StatusCode};

    fn status_error(status: u16) -> ApiError {
        ApiError::from_response(
            Method::GET,
            "/projects/1/issues/5",
            StatusCode::from_u16(status).unwrap(),
            br#"{"message":"upstream says no"}"#,
        )
    }

    fn result_text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|content| content.as_text())
            .map(|text| text.text.clone())
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn test_single_mode_status_mapping() {
        let kind = ApiCallKind::Single {
            resource: "issue 5 in project 1",
        };

        let unauthorized = classify_api_error(&status_error(401), kind).unwrap();
        assert_eq!(unauthorized.is_error, Some(true));
        assert!(result_text(&unauthorized).contains("Authentication failed"));

        let not_found = classify_api_error(&status_error(404), kind).unwrap();
        assert_eq!(
            result_text(&not_found),
            "issue 5 in project 1 not found or access denied (404)"
        );

        let bad_request = classify_api_error(&status_error(422), kind).unwrap();
        let text = result_text(&bad_request);
        assert!(text.starts_with("failed to process issue 5 in project 1: "));
        assert!(text.contains("upstream says no"));
        assert!(text.ends_with("(status: 422)"));

        let server_error = classify_api_error(&status_error(500), kind).unwrap_err();
        assert!(server_error.message.contains("(status: 500)"));
    }

    #[test]
    fn test_list_mode_does_not_special_case_not_found() {
        let kind = ApiCallKind::List { resource: "issues" };

        let escalated = classify_api_error(&status_error(404), kind).unwrap_err();
        assert!(escalated.message.starts_with("failed to list issues: "));
        assert!(!escalated.message.contains("not found or access denied"));

        assert!(classify_api_error(&status_error(400), kind).is_err());

        let unauthorized = classify_api_error(&status_error(401), kind).unwrap();
        assert!(result_text(&unauthorized).contains("Authentication failed"));
    }

    #[test]
    fn test_mutation_mode_names_operation() {
        let kind = ApiCallKind::Mutation {
            resource: "project 1",
            operation: "create issue",
        };

        let rejected = classify_api_error(&status_error(400), kind).unwrap();
        assert!(result_text(&rejected).starts_with("failed to create issue: "));

        let not_found = classify_api_error(&status_error(404), kind).unwrap();
        assert!(result_text(&not_found).contains("not found or access denied (404)"));

        let escalated = classify_api_error(&status_error(503), kind).unwrap_err();
        assert!(
            escalated
                .message
                .starts_with("failed to create issue project 1: ")
        );
    }

    #[test]
    fn test_missing_status_escalates() {
        let error = ApiError::GraphQL("field 'licenses' doesn't exist".to_string());
        let escalated = classify_api_error(&error, ApiCallKind::Single { resource: "licenses" })
            .unwrap_err();
        assert!(escalated.message.contains("(status: 500)"));
    }

    #[test]
    fn test_validation_error_prefix() {
        let result = validation_error("missing required parameter: project_id");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "Validation Error: missing required parameter: project_id"
        );
    }
}
