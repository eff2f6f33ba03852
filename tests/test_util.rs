//! Shared helpers for integration tests
//!
//! Tests run against a local mockito server standing in for GitLab, so no token or
//! network access is needed.

#![allow(dead_code)]

use mockito::ServerGuard;
use rmcp::model::CallToolResult;
use tokio::time::Duration;

use gitlab_insight::gitlab::GitLabClient;
use gitlab_insight::tools::GitLabInsightTools;
use gitlab_insight::tools::registry::init_toolsets;

/// Token sent by test clients
pub const TEST_TOKEN: &str = "glpat-test-token";

/// Starts a fake GitLab server.
pub async fn start_mock_gitlab() -> ServerGuard {
    mockito::Server::new_async().await
}

/// Creates a client pointed at the mock server with a short timeout
pub fn create_test_gitlab_client(server: &ServerGuard) -> GitLabClient {
    GitLabClient::new(
        Some(TEST_TOKEN.to_string()),
        Some(&server.url()),
        Some(Duration::from_secs(5)),
    )
    .expect("Failed to create GitLab client for testing")
}

/// Builds the tool server with the given toolsets enabled
pub fn create_test_tools(
    server: &ServerGuard,
    toolsets: &[&str],
    read_only: bool,
    dynamic: bool,
) -> GitLabInsightTools {
    let group = init_toolsets(toolsets, read_only, dynamic).expect("valid toolsets");
    GitLabInsightTools::with_client(create_test_gitlab_client(server), group, dynamic)
}

/// Concatenated text content of a tool result
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| content.as_text())
        .map(|text| text.text.clone())
        .collect::<Vec<_>>()
        .join("")
}

/// Parses the text content of a tool result as JSON
pub fn result_json(result: &CallToolResult) -> serde_json::Value {
    serde_json::from_str(&result_text(result)).expect("tool result is JSON")
}

/// Minimal GitLab issue payload
pub fn issue_json(iid: u64, description: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 1000 + iid,
        "iid": iid,
        "project_id": 1,
        "title": format!("Issue {}", iid),
        "description": description,
        "state": "opened",
        "labels": ["bug"],
        "author": {
            "id": 7,
            "username": "alice",
            "name": "Alice",
            "web_url": "https://gitlab.example.com/alice",
            "avatar_url": "https://gitlab.example.com/alice.png"
        },
        "web_url": format!("https://gitlab.example.com/group/app/-/issues/{}", iid),
        "user_notes_count": 3,
        "_links": {
            "self": format!("https://gitlab.example.com/api/v4/projects/1/issues/{}", iid)
        }
    })
}
