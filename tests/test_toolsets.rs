//! Toolset gating as seen by an MCP client
//!
//! These tests check which tools the server lists under different startup
//! configurations and how dynamic enablement changes that list.

use std::collections::HashSet;

mod test_util;
use gitlab_insight::tools::registry::{DISCOVERY_TOOLS, build_toolset_group};
use gitlab_insight::toolsets::ToolsetError;
use test_util::{create_test_tools, start_mock_gitlab};

async fn available_names(tools: &gitlab_insight::tools::GitLabInsightTools) -> HashSet<String> {
    tools
        .available_tools()
        .await
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect()
}

/// Every catalogued tool has a handler, and the router holds nothing else
/// besides the two discovery tools.
#[tokio::test]
async fn test_catalogue_matches_router() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], false, false);

    let registered: HashSet<String> = tools
        .registered_tools()
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect();
    assert_eq!(registered.len(), 42);

    let group = build_toolset_group(false);
    for toolset in group.toolsets() {
        for name in toolset.all_tools() {
            assert!(registered.contains(name), "no handler for {}", name);
        }
    }
    for name in DISCOVERY_TOOLS {
        assert!(registered.contains(*name));
    }
}

#[tokio::test]
async fn test_all_toolsets_expose_every_tool_except_discovery() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], false, false);

    let names = available_names(&tools).await;
    assert_eq!(names.len(), 40);
    assert!(names.contains("create_issue"));
    assert!(names.contains("search"));
    assert!(!names.contains("enable_toolset"));
    assert!(!names.contains("list_available_toolsets"));
}

/// With only `projects,merge_requests` enabled, issue tools are neither listed
/// nor callable.
#[tokio::test]
async fn test_disabled_toolset_hides_its_tools() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["projects", "merge_requests"], false, false);

    let names = available_names(&tools).await;
    assert!(names.contains("get_project"));
    assert!(names.contains("create_merge_request"));
    assert!(!names.contains("list_issues"));
    assert!(!names.contains("get_issue"));
    assert!(!names.contains("get_milestone"));

    assert!(!tools.is_tool_available("list_issues").await);
    assert!(tools.is_tool_available("list_merge_requests").await);
}

/// Read-only mode keeps read tools of enabled toolsets and drops every write tool.
#[tokio::test]
async fn test_read_only_hides_write_tools() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], true, false);

    let names = available_names(&tools).await;
    assert!(names.contains("get_issue"));
    assert!(names.contains("list_repository_tags"));
    for write_tool in [
        "create_issue",
        "update_issue",
        "create_issue_comment",
        "create_merge_request",
        "update_milestone",
        "create_repository_tag",
        "delete_repository_tag",
    ] {
        assert!(!names.contains(write_tool), "{} should be hidden", write_tool);
    }
    assert_eq!(names.len(), 40 - 12);
}

#[tokio::test]
async fn test_dynamic_mode_starts_with_discovery_only() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], false, true);

    let names = available_names(&tools).await;
    let expected: HashSet<String> = DISCOVERY_TOOLS.iter().map(|name| name.to_string()).collect();
    assert_eq!(names, expected);

    let overview = tools.toolsets_overview().await;
    assert!(overview.starts_with("Available Toolsets (6):"));
    assert!(overview.contains("- issues: "));
    assert!(overview.contains("(disabled)"));
    assert!(!overview.contains("(enabled)"));
}

/// Enabling a toolset at runtime exposes its tools; repeating it or naming an
/// unknown toolset is rejected without changing state.
#[tokio::test]
async fn test_dynamic_enable_exposes_tools() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], false, true);

    assert!(!tools.is_tool_available("get_issue").await);
    tools.activate_toolset("issues").await.unwrap();
    assert!(tools.is_tool_available("get_issue").await);
    assert!(tools.is_tool_available("create_milestone").await);
    assert!(!tools.is_tool_available("get_merge_request").await);
    assert!(tools.is_tool_available("enable_toolset").await);

    assert_eq!(
        tools.activate_toolset("issues").await,
        Err(ToolsetError::AlreadyEnabled("issues".to_string()))
    );
    assert_eq!(
        tools.activate_toolset("pipelines").await,
        Err(ToolsetError::NotFound("pipelines".to_string()))
    );

    let overview = tools.toolsets_overview().await;
    assert!(overview.contains("- issues: GitLab issues, issue comments, labels and milestones [12 tools] (enabled)"));
    assert!(overview.contains("- security: "));
}

#[tokio::test]
async fn test_dynamic_enable_respects_read_only() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], true, true);

    tools.activate_toolset("merge_requests").await.unwrap();
    assert!(tools.is_tool_available("list_merge_requests").await);
    assert!(!tools.is_tool_available("create_merge_request").await);
}

/// Clones share toolset state, so an enable in one handle is visible in another.
#[tokio::test]
async fn test_cloned_server_shares_toolset_state() {
    let server = start_mock_gitlab().await;
    let tools = create_test_tools(&server, &["all"], false, true);
    let handle = tools.clone();

    handle.activate_toolset("users").await.unwrap();
    assert!(tools.is_tool_available("get_current_user").await);
}
