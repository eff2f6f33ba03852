//! List response shaping: truncation, field filtering and pagination envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{EntityConfig, entity_config};
use super::field_filter::FieldFilter;
use super::truncation::TextTruncator;
use crate::types::PageInfo;

/// Pagination details reported back to the caller alongside list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub items_per_page: u64,
}

impl PaginationMetadata {
    /// Returns `None` when the upstream response carried no pagination data.
    pub fn from_page_info(page_info: &PageInfo) -> Option<Self> {
        if page_info.is_empty() {
            return None;
        }
        Some(Self {
            total_items: page_info.total_items,
            total_pages: page_info.total_pages,
            current_page: page_info.current_page,
            items_per_page: page_info.items_per_page,
        })
    }
}

/// Envelope returned by optimized list tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse {
    pub items: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMetadata>,
}

/// Shapes list responses for one entity type.
///
/// ```
/// use gitlab_insight::formatter::ResponseOptimizer;
/// use gitlab_insight::types::PageInfo;
/// use serde_json::json;
///
/// let optimizer = ResponseOptimizer::new("issue");
/// let issues = json!([{"title": "t", "web_url": "https://example.com"}]);
/// let shaped = optimizer
///     .optimize_list_response(&issues, &PageInfo::default())
///     .unwrap();
/// assert_eq!(shaped.items, json!([{"title": "t"}]));
/// assert!(shaped.pagination.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ResponseOptimizer {
    config: EntityConfig,
    truncator: TextTruncator,
    filter: FieldFilter,
}

impl ResponseOptimizer {
    pub fn new(entity_type: &str) -> Self {
        Self {
            config: entity_config(entity_type),
            truncator: TextTruncator::default(),
            filter: FieldFilter::for_entity(entity_type),
        }
    }

    /// Truncates text fields, drops denylisted fields and attaches pagination.
    pub fn optimize_list_response<T: Serialize + ?Sized>(
        &self,
        items: &T,
        page_info: &PageInfo,
    ) -> Result<PaginatedResponse, serde_json::Error> {
        let mut shaped = self
            .truncator
            .truncate_list_response(items, self.config.truncate_fields)?;
        self.filter.filter_value(&mut shaped);

        Ok(PaginatedResponse {
            items: shaped,
            pagination: PaginationMetadata::from_page_info(page_info),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::truncation::{MAX_FIELD_LENGTH, TRUNCATION_SUFFIX};
    use serde_json::json;

    #[test]
    fn test_pagination_all_zero_is_none() {
        assert_eq!(PaginationMetadata::from_page_info(&PageInfo::default()), None);
    }

    #[test]
    fn test_pagination_single_non_zero_copies_all_fields() {
        let info = PageInfo {
            total_items: 0,
            total_pages: 0,
            current_page: 2,
            items_per_page: 0,
        };
        let metadata = PaginationMetadata::from_page_info(&info).unwrap();
        assert_eq!(metadata.current_page, 2);
        assert_eq!(metadata.total_items, 0);
        assert_eq!(metadata.total_pages, 0);
        assert_eq!(metadata.items_per_page, 0);
    }

    #[test]
    fn test_optimize_issue_list() {
        let optimizer = ResponseOptimizer::new("issue");
        let issues = json!([
            {
                "iid": 1,
                "title": "first",
                "description": "d".repeat(500),
                "_links": {"self": "x"},
                "web_url": "https://gitlab.com/g/p/-/issues/1",
                "author": {"username": "bob", "avatar_url": "a"}
            },
            {"iid": 2, "title": "second", "description": null}
        ]);
        let info = PageInfo {
            total_items: 2,
            total_pages: 1,
            current_page: 1,
            items_per_page: 20,
        };

        let shaped = optimizer.optimize_list_response(&issues, &info).unwrap();

        let first = &shaped.items[0];
        let description = first["description"].as_str().unwrap();
        assert_eq!(
            description.chars().count(),
            MAX_FIELD_LENGTH + TRUNCATION_SUFFIX.len()
        );
        assert!(first.get("_links").is_none());
        assert!(first.get("web_url").is_none());
        assert_eq!(first["author"], json!({"username": "bob"}));
        assert!(shaped.items[1]["description"].is_null());
        assert_eq!(shaped.pagination.unwrap().total_items, 2);
    }

    #[test]
    fn test_envelope_omits_absent_pagination() {
        let optimizer = ResponseOptimizer::new("user");
        let shaped = optimizer
            .optimize_list_response(&json!([{"username": "u"}]), &PageInfo::default())
            .unwrap();

        let encoded = serde_json::to_value(&shaped).unwrap();
        assert_eq!(encoded, json!({"items": [{"username": "u"}]}));
    }
}
