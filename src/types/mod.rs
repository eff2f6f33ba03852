//! Core type definitions for GitLab resources
//!
//! Typed models for the entities returned by the GitLab REST and GraphQL APIs,
//! plus small value types shared between the client and the tool handlers.

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub mod filters;
pub mod issue;
pub mod label;
pub mod merge_request;
pub mod milestone;
pub mod project;
pub mod search;
pub mod security;
pub mod user;

pub use filters::*;
pub use issue::*;
pub use label::*;
pub use merge_request::*;
pub use milestone::*;
pub use project::*;
pub use search::*;
pub use security::*;
pub use user::*;

/// Maximum page size accepted by the GitLab API
pub const MAX_PER_PAGE: u32 = 100;

/// Project reference, either a numeric ID or a `namespace/path` string.
///
/// Accepts a JSON number or string when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectRef(pub String);

impl JsonSchema for ProjectRef {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "ProjectRef".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": ["integer", "string"],
            "description": "Project ID or full path, e.g. 42 or \"group/project\""
        })
    }
}

impl ProjectRef {
    pub fn new<T: Into<String>>(reference: T) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use as a URL path segment
    pub fn encoded(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ProjectRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawProjectRef {
            Id(u64),
            Path(String),
        }

        match RawProjectRef::deserialize(deserializer)? {
            RawProjectRef::Id(id) => Ok(Self(id.to_string())),
            RawProjectRef::Path(path) => {
                let path = path.trim();
                if path.is_empty() {
                    Err(D::Error::custom("project_id must not be empty"))
                } else {
                    Ok(Self(path.to_string()))
                }
            }
        }
    }
}

/// Pagination counters reported by GitLab in `X-Total`, `X-Total-Pages`,
/// `X-Page` and `X-Per-Page` response headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub items_per_page: u64,
}

impl PageInfo {
    /// True when the response carried no pagination data at all
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
            && self.total_pages == 0
            && self.current_page == 0
            && self.items_per_page == 0
    }
}

/// Page selection accepted by every list tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageParams {
    #[schemars(description = "Page number to retrieve (default: 1)")]
    pub page: Option<u32>,
    #[schemars(description = "Number of results per page (default: 20, max: 100)")]
    pub per_page: Option<u32>,
}

impl PageParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == Some(0) {
            return Err("page must be greater than 0".to_string());
        }
        match self.per_page {
            Some(per_page) if per_page == 0 || per_page > MAX_PER_PAGE => Err(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_ref_accepts_number_and_path() {
        let by_id: ProjectRef = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(by_id.as_str(), "42");

        let by_path: ProjectRef = serde_json::from_value(json!(" group/sub/project ")).unwrap();
        assert_eq!(by_path.as_str(), "group/sub/project");
        assert_eq!(by_path.encoded(), "group%2Fsub%2Fproject");

        assert!(serde_json::from_value::<ProjectRef>(json!("")).is_err());
        assert!(serde_json::from_value::<ProjectRef>(json!(1.5)).is_err());
    }

    #[test]
    fn test_project_ref_schema_accepts_number_and_string() {
        let schema = serde_json::to_value(schemars::schema_for!(ProjectRef)).unwrap();
        assert_eq!(schema["type"], json!(["integer", "string"]));
    }

    #[test]
    fn test_page_params_validation() {
        assert!(PageParams::default().validate().is_ok());
        assert!(
            PageParams {
                page: Some(2),
                per_page: Some(100)
            }
            .validate()
            .is_ok()
        );
        assert!(
            PageParams {
                page: Some(0),
                per_page: None
            }
            .validate()
            .is_err()
        );
        assert!(
            PageParams {
                page: None,
                per_page: Some(101)
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_page_info_is_empty() {
        assert!(PageInfo::default().is_empty());
        assert!(
            !PageInfo {
                total_pages: 3,
                ..Default::default()
            }
            .is_empty()
        );
    }
}
