//! Instance, group and project search

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{list_result, require_text};
use crate::gitlab::GitLabClient;
use crate::gitlab::search::SearchTarget;
use crate::tools::error::{ApiCallKind, classify_api_error, validation_error};
use crate::types::{PageParams, ProjectRef, SearchResourceType, SearchScope};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Kind of resource to search for")]
    pub resource_type: SearchResourceType,
    #[schemars(description = "Search term")]
    pub search: String,
    #[serde(default)]
    #[schemars(description = "global (default), group or project")]
    pub scope: SearchScope,
    #[schemars(description = "Group ID or path; required when scope is group")]
    pub group_id: Option<ProjectRef>,
    #[schemars(description = "Project ID or path; required when scope is project")]
    pub project_id: Option<ProjectRef>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl SearchParams {
    /// Resolves the request target, checking the scope against the resource type.
    fn target(&self) -> Result<SearchTarget<'_>, String> {
        if !self.resource_type.supports(self.scope) {
            return Err(self.resource_type.unsupported_scope_message());
        }
        match self.scope {
            SearchScope::Global => Ok(SearchTarget::Global),
            SearchScope::Group => self
                .group_id
                .as_ref()
                .map(SearchTarget::Group)
                .ok_or_else(|| "group_id is required when scope is group".to_string()),
            SearchScope::Project => self
                .project_id
                .as_ref()
                .map(SearchTarget::Project)
                .ok_or_else(|| "project_id is required when scope is project".to_string()),
        }
    }
}

pub async fn search(client: &GitLabClient, params: SearchParams) -> Result<CallToolResult, McpError> {
    if let Err(message) = require_text("search", &params.search).and(params.page.validate()) {
        return Ok(validation_error(message));
    }
    let target = match params.target() {
        Ok(target) => target,
        Err(message) => return Ok(validation_error(message)),
    };

    let resource = format!("{} (scope={})", params.resource_type, params.scope);
    match client
        .search(
            target,
            params.resource_type,
            &params.search,
            params.page.page,
            params.page.per_page,
        )
        .await
    {
        Ok(response) => list_result(&response.data, "search results"),
        Err(e) => classify_api_error(&e, ApiCallKind::List { resource: &resource }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> SearchParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scope_defaults_to_global() {
        let params = params(json!({ "resource_type": "issues", "search": "crash" }));
        assert_eq!(params.scope, SearchScope::Global);
        assert!(matches!(params.target(), Ok(SearchTarget::Global)));
    }

    #[test]
    fn test_unsupported_scope_is_rejected() {
        let params = params(json!({
            "resource_type": "commits",
            "search": "fix",
            "scope": "group",
            "group_id": "my-group"
        }));
        assert_eq!(
            params.target().unwrap_err(),
            "commits search only supports global or project scope"
        );
    }

    #[test]
    fn test_scope_requires_matching_id() {
        let params = params(json!({
            "resource_type": "notes",
            "search": "todo",
            "scope": "project"
        }));
        assert_eq!(
            params.target().unwrap_err(),
            "project_id is required when scope is project"
        );

        let with_project = SearchParams {
            project_id: Some(ProjectRef::new("g/app")),
            ..params
        };
        assert!(matches!(with_project.target(), Ok(SearchTarget::Project(_))));
    }
}
