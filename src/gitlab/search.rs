use serde::Serialize;
use serde_json::Value;

use super::client::{ApiResponse, GitLabClient};
use super::error::ApiError;
use crate::types::{ProjectRef, SearchResourceType};

/// Where a search request is sent
#[derive(Debug, Clone, Copy)]
pub enum SearchTarget<'a> {
    Global,
    Group(&'a ProjectRef),
    Project(&'a ProjectRef),
}

impl SearchTarget<'_> {
    fn path(&self) -> String {
        match self {
            Self::Global => "/search".to_string(),
            Self::Group(group) => format!("/groups/{}/search", group.encoded()),
            Self::Project(project) => format!("/projects/{}/search", project.encoded()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SearchQuery<'a> {
    scope: String,
    search: &'a str,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl GitLabClient {
    /// Runs a scoped search. Result shape depends on `resource_type`, so items are
    /// returned as generic JSON values.
    pub async fn search(
        &self,
        target: SearchTarget<'_>,
        resource_type: SearchResourceType,
        search: &str,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<ApiResponse<Vec<Value>>, ApiError> {
        let query = SearchQuery {
            scope: resource_type.to_string(),
            search,
            page,
            per_page,
        };
        self.get(&target.path(), &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_target_paths() {
        let group = ProjectRef::new("my-group");
        let project = ProjectRef::new("my-group/app");
        assert_eq!(SearchTarget::Global.path(), "/search");
        assert_eq!(SearchTarget::Group(&group).path(), "/groups/my-group/search");
        assert_eq!(
            SearchTarget::Project(&project).path(),
            "/projects/my-group%2Fapp/search"
        );
    }
}
