//! Tool function implementations organized by functionality
//!
//! Each function parses its parameters, performs one GitLab call and turns the
//! outcome into a tool result.

pub mod issue;
pub mod merge_request;
pub mod milestone;
pub mod project;
pub mod search;
pub mod security;
pub mod tag;
pub mod user;

use chrono::{DateTime, NaiveDate};
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use super::error::serialization_error;
use crate::formatter::ResponseOptimizer;
use crate::types::PageInfo;

/// Text returned for lists without items
pub const EMPTY_LIST: &str = "[]";

pub(crate) fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Serializes `value` as the JSON text of a successful result.
pub(crate) fn json_result<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(value).map_err(|e| serialization_error(what, e))?;
    Ok(text_result(text))
}

/// JSON array result, or `[]` when there are no items.
pub(crate) fn list_result<T: Serialize>(items: &[T], what: &str) -> Result<CallToolResult, McpError> {
    if items.is_empty() {
        return Ok(text_result(EMPTY_LIST));
    }
    json_result(items, what)
}

/// Paginated envelope of truncated and filtered items, or `[]` when empty.
pub(crate) fn optimized_list_result<T: Serialize>(
    items: &[T],
    page_info: &PageInfo,
    entity_type: &str,
    what: &str,
) -> Result<CallToolResult, McpError> {
    if items.is_empty() {
        return Ok(text_result(EMPTY_LIST));
    }
    let optimized = ResponseOptimizer::new(entity_type)
        .optimize_list_response(items, page_info)
        .map_err(|e| serialization_error(what, e))?;
    json_result(&optimized, what)
}

/// Checks a `YYYY-MM-DD` date parameter.
pub(crate) fn validate_date(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(value) if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => Err(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            field, value
        )),
        _ => Ok(()),
    }
}

/// Checks an ISO 8601 datetime parameter such as `2024-01-31T00:00:00Z`.
pub(crate) fn validate_datetime(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(value) if DateTime::parse_from_rfc3339(value).is_err() => Err(format!(
            "{} must be an ISO 8601 datetime (e.g. 2024-01-31T00:00:00Z), got '{}'",
            field, value
        )),
        _ => Ok(()),
    }
}

/// Rejects empty or whitespace-only required text parameters.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}

/// Runs each check in order and returns the first failure.
pub(crate) fn first_error<I>(checks: I) -> Result<(), String>
where
    I: IntoIterator<Item = Result<(), String>>,
{
    checks.into_iter().collect::<Result<Vec<()>, String>>().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("due_date", None).is_ok());
        assert!(validate_date("due_date", Some("2024-02-29")).is_ok());
        assert!(validate_date("due_date", Some("2024-02-30")).is_err());
        assert!(validate_date("due_date", Some("next friday")).is_err());
    }

    #[test]
    fn test_validate_datetime() {
        assert!(validate_datetime("created_after", Some("2024-01-31T00:00:00Z")).is_ok());
        assert!(validate_datetime("created_after", Some("2024-01-31T09:00:00+09:00")).is_ok());
        assert!(validate_datetime("created_after", Some("2024-01-31")).is_err());
    }

    #[test]
    fn test_first_error_returns_first_failure() {
        let result = first_error([
            Ok(()),
            Err("first".to_string()),
            Err("second".to_string()),
        ]);
        assert_eq!(result, Err("first".to_string()));
        assert!(first_error([Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn test_list_result_empty_is_brackets() {
        let empty: Vec<serde_json::Value> = Vec::new();
        let result = list_result(&empty, "tags").unwrap();
        assert_eq!(result.is_error, Some(false));
        let text = result.content[0].as_text().unwrap().text.clone();
        assert_eq!(text, EMPTY_LIST);
    }
}
