//! Catalogue of toolsets and the tools each one contributes

use crate::toolsets::{ALL_TOOLSETS, Toolset, ToolsetError, ToolsetGroup};

/// Toolsets enabled when none are configured
pub const DEFAULT_TOOLSETS: &[&str] = &[ALL_TOOLSETS];

/// Meta tools that exist only in dynamic mode
pub const DISCOVERY_TOOLS: &[&str] = &["list_available_toolsets", "enable_toolset"];

struct ToolsetEntry {
    name: &'static str,
    description: &'static str,
    read: &'static [&'static str],
    write: &'static [&'static str],
}

const CATALOGUE: &[ToolsetEntry] = &[
    ToolsetEntry {
        name: "projects",
        description: "GitLab projects, branches, commits and repository tags",
        read: &[
            "get_project",
            "list_projects",
            "list_project_branches",
            "list_project_commits",
            "list_repository_tags",
            "get_repository_tag",
            "get_tag_commit",
        ],
        write: &["create_repository_tag", "delete_repository_tag"],
    },
    ToolsetEntry {
        name: "issues",
        description: "GitLab issues, issue comments, labels and milestones",
        read: &[
            "get_issue",
            "list_issues",
            "get_issue_comments",
            "get_issue_labels",
            "get_milestone",
            "list_milestones",
        ],
        write: &[
            "create_issue",
            "update_issue",
            "create_issue_comment",
            "update_issue_comment",
            "create_milestone",
            "update_milestone",
        ],
    },
    ToolsetEntry {
        name: "merge_requests",
        description: "GitLab merge requests and merge request comments",
        read: &[
            "get_merge_request",
            "list_merge_requests",
            "get_merge_request_comments",
        ],
        write: &[
            "create_merge_request",
            "update_merge_request",
            "create_merge_request_comment",
            "update_merge_request_comment",
        ],
    },
    ToolsetEntry {
        name: "security",
        description: "Security scan findings and license compliance",
        read: &[
            "get_project_sast",
            "get_project_dast",
            "get_project_dependency_scanning",
            "get_project_container_scanning",
            "get_project_secret_detection",
            "get_project_license_compliance",
        ],
        write: &[],
    },
    ToolsetEntry {
        name: "users",
        description: "GitLab users and project members",
        read: &[
            "get_current_user",
            "get_user",
            "get_user_status",
            "list_users",
            "list_project_users",
        ],
        write: &[],
    },
    ToolsetEntry {
        name: "search",
        description: "Search across the instance, a group or a project",
        read: &["search"],
        write: &[],
    },
];

/// Builds the full toolset group with every toolset disabled.
pub fn build_toolset_group(read_only: bool) -> ToolsetGroup {
    let mut group = ToolsetGroup::new(read_only);
    for entry in CATALOGUE {
        let mut toolset = Toolset::new(entry.name, entry.description);
        toolset
            .add_read_tools(entry.read.iter().copied())
            .add_write_tools(entry.write.iter().copied());
        group.add_toolset(toolset);
    }
    group
}

/// Builds the toolset group and enables the configured toolsets.
///
/// Nothing is enabled up front in dynamic mode; the agent turns toolsets on through
/// the discovery tools instead.
pub fn init_toolsets<S: AsRef<str>>(
    enabled: &[S],
    read_only: bool,
    dynamic: bool,
) -> Result<ToolsetGroup, ToolsetError> {
    let mut group = build_toolset_group(read_only);
    if !dynamic {
        group.enable_toolsets(enabled)?;
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_tool_names_are_unique() {
        let group = build_toolset_group(false);
        let names: Vec<&str> = group
            .toolsets()
            .iter()
            .flat_map(|toolset| toolset.all_tools())
            .collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 40);
    }

    #[test]
    fn test_init_enables_default_toolsets() {
        let group = init_toolsets(DEFAULT_TOOLSETS, false, false).unwrap();
        assert!(group.toolsets().iter().all(Toolset::is_enabled));
        assert!(group.is_tool_active("create_merge_request"));
    }

    #[test]
    fn test_init_dynamic_starts_with_nothing_enabled() {
        let group = init_toolsets(DEFAULT_TOOLSETS, false, true).unwrap();
        assert!(group.active_tool_names().is_empty());
    }

    #[test]
    fn test_init_rejects_unknown_toolset() {
        let result = init_toolsets(&["issues", "pipelines"], false, false);
        assert_eq!(
            result.unwrap_err(),
            ToolsetError::NotFound("pipelines".to_string())
        );
    }

    #[test]
    fn test_read_only_group_hides_write_tools() {
        let group = init_toolsets(&["projects"], true, false).unwrap();
        assert!(group.is_tool_active("list_repository_tags"));
        assert!(!group.is_tool_active("delete_repository_tag"));
        assert_eq!(group.toolset("projects").unwrap().tool_count(), 7);
    }
}
