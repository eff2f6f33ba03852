//! Per-entity response shaping policy
//!
//! A single lookup table maps an entity tag ("issue", "merge_request", ...) to the
//! fields that get truncated and the field paths that get dropped.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Truncation and filtering policy for one entity type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityConfig {
    /// Free-text fields shortened by the truncator
    pub truncate_fields: &'static [&'static str],
    /// Dotted paths (one or two segments) removed by the field filter
    pub filter_fields: &'static [&'static str],
}

static ENTITY_CONFIGS: Lazy<HashMap<&'static str, EntityConfig>> = Lazy::new(|| {
    HashMap::from([
        (
            "issue",
            EntityConfig {
                truncate_fields: &["description"],
                filter_fields: &[
                    "_links",
                    "web_url",
                    "author.web_url",
                    "author.avatar_url",
                    "assignees.web_url",
                    "assignees.avatar_url",
                    "service_desk_reply_to",
                    "moved_to_id",
                    "epic_issue_id",
                    "issue_link_id",
                    "user_notes_count",
                    "label_details",
                ],
            },
        ),
        (
            "merge_request",
            EntityConfig {
                truncate_fields: &["description"],
                filter_fields: &[
                    "_links",
                    "web_url",
                    "author.web_url",
                    "author.avatar_url",
                    "assignees.web_url",
                    "assignees.avatar_url",
                    "reviewers.web_url",
                    "reviewers.avatar_url",
                    "label_details",
                    "diff_refs",
                    "references",
                ],
            },
        ),
        (
            "project",
            EntityConfig {
                truncate_fields: &["description"],
                filter_fields: &[
                    "web_url",
                    "avatar_url",
                    "forked_from_project",
                    "star_count",
                    "forks_count",
                ],
            },
        ),
        (
            "user",
            EntityConfig {
                truncate_fields: &["bio"],
                filter_fields: &[
                    "web_url",
                    "avatar_url",
                    "website_url",
                    "linkedin",
                    "twitter",
                    "skype",
                    "location",
                ],
            },
        ),
        (
            "milestone",
            EntityConfig {
                truncate_fields: &["description"],
                filter_fields: &[],
            },
        ),
        (
            "commit",
            EntityConfig {
                truncate_fields: &["message"],
                filter_fields: &[],
            },
        ),
        (
            "blob",
            EntityConfig {
                truncate_fields: &["data"],
                filter_fields: &[],
            },
        ),
        (
            "note",
            EntityConfig {
                truncate_fields: &["body"],
                filter_fields: &[],
            },
        ),
    ])
});

/// Looks up the policy for an entity tag, ignoring case.
///
/// Unknown tags get an empty policy, which makes every shaping step a no-op.
pub fn entity_config(entity_type: &str) -> EntityConfig {
    ENTITY_CONFIGS
        .get(entity_type.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_config_lookup() {
        assert_eq!(entity_config("issue").truncate_fields, &["description"]);
        assert_eq!(entity_config("commit").truncate_fields, &["message"]);
        assert_eq!(entity_config("note").truncate_fields, &["body"]);
        assert!(entity_config("user").filter_fields.contains(&"avatar_url"));
    }

    #[test]
    fn test_entity_config_case_insensitive() {
        assert_eq!(entity_config("Merge_Request"), entity_config("merge_request"));
        assert_eq!(entity_config("ISSUE"), entity_config("issue"));
    }

    #[test]
    fn test_unknown_entity_is_empty() {
        let config = entity_config("pipeline");
        assert!(config.truncate_fields.is_empty());
        assert!(config.filter_fields.is_empty());
    }
}
