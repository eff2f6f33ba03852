//! End-to-end tests of tool handlers against a fake GitLab server
//!
//! Each test mounts the REST or GraphQL endpoints a handler calls and checks the
//! text the agent would receive, including how upstream failures are reported.

use mockito::Matcher;
use serde_json::json;

mod test_util;
use gitlab_insight::tools::error::AUTHENTICATION_FAILED_MESSAGE;
use gitlab_insight::tools::functions::{issue, merge_request, search, security, tag, user};
use gitlab_insight::types::{PageParams, ProjectRef, SearchResourceType, SearchScope, SecurityReportType};
use test_util::{create_test_gitlab_client, issue_json, result_json, result_text, start_mock_gitlab};

fn list_issues_params(project_id: u64) -> issue::ListIssuesParams {
    serde_json::from_value(json!({ "project_id": project_id })).unwrap()
}

/// An empty issue list is returned as the literal `[]` rather than an envelope.
#[tokio::test]
async fn test_list_issues_empty_returns_brackets() {
    let mut server = start_mock_gitlab().await;
    let mock = server
        .mock("GET", "/api/v4/projects/1/issues")
        .match_query(Matcher::Any)
        .match_header("private-token", test_util::TEST_TOKEN)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let result = issue::list_issues(&client, list_issues_params(1)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.is_error, Some(false));
    assert_eq!(result_text(&result), "[]");
}

/// Long issue descriptions are cut to 300 characters plus `...`, noisy fields are
/// dropped and pagination headers are surfaced in the envelope.
#[tokio::test]
async fn test_list_issues_truncates_and_filters() {
    let mut server = start_mock_gitlab().await;
    let long_description = "d".repeat(500);
    let body = json!([issue_json(1, &long_description), issue_json(2, &long_description)]);
    server
        .mock("GET", "/api/v4/projects/1/issues")
        .match_query(Matcher::UrlEncoded("per_page".into(), "20".into()))
        .with_status(200)
        .with_header("x-total", "2")
        .with_header("x-total-pages", "1")
        .with_header("x-page", "1")
        .with_header("x-per-page", "20")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params = issue::ListIssuesParams {
        page: PageParams {
            page: None,
            per_page: Some(20),
        },
        ..list_issues_params(1)
    };
    let result = issue::list_issues(&client, params).await.unwrap();
    let envelope = result_json(&result);

    let items = envelope["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        let description = item["description"].as_str().unwrap();
        assert_eq!(description.chars().count(), 303);
        assert!(description.ends_with("..."));
        assert!(item.get("_links").is_none());
        assert!(item.get("web_url").is_none());
        assert!(item.get("user_notes_count").is_none());
        assert!(item["author"].get("web_url").is_none());
        assert_eq!(item["author"]["username"], "alice");
    }
    assert_eq!(
        envelope["pagination"],
        json!({
            "total_items": 2,
            "total_pages": 1,
            "current_page": 1,
            "items_per_page": 20
        })
    );
}

/// A single-issue 404 is a readable tool error, not a protocol failure.
#[tokio::test]
async fn test_get_issue_not_found_is_recovered() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("GET", "/api/v4/projects/1/issues/5")
        .with_status(404)
        .with_body(r#"{"message":"404 Not found"}"#)
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params = issue::GetIssueParams {
        project_id: ProjectRef::new("1"),
        issue_iid: 5,
    };
    let result = issue::get_issue(&client, params).await.unwrap();

    assert_eq!(result.is_error, Some(true));
    assert_eq!(
        result_text(&result),
        "issue 5 in project \"1\" not found or access denied (404)"
    );
}

#[tokio::test]
async fn test_expired_token_is_recovered_for_lists() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("GET", "/api/v4/projects/1/issues")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"401 Unauthorized"}"#)
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let result = issue::list_issues(&client, list_issues_params(1)).await.unwrap();

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result_text(&result), AUTHENTICATION_FAILED_MESSAGE);
}

/// Server errors and list-mode 404s escalate as internal errors.
#[tokio::test]
async fn test_list_issues_upstream_failures_escalate() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("GET", "/api/v4/projects/1/issues")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"500 Internal Server Error"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v4/projects/2/issues")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message":"404 Project Not Found"}"#)
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);

    let error = issue::list_issues(&client, list_issues_params(1)).await.unwrap_err();
    assert!(error.message.starts_with("failed to list issues in project \"1\": "));
    assert!(error.message.ends_with("(status: 500)"));

    let error = issue::list_issues(&client, list_issues_params(2)).await.unwrap_err();
    assert!(error.message.contains("(status: 404)"));
    assert!(!error.message.contains("not found or access denied"));
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_gitlab() {
    let mut server = start_mock_gitlab().await;
    let get_mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let put_mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = create_test_gitlab_client(&server);

    let params = issue::ListIssuesParams {
        page: PageParams {
            page: Some(0),
            per_page: None,
        },
        ..list_issues_params(1)
    };
    let result = issue::list_issues(&client, params).await.unwrap();
    assert_eq!(result_text(&result), "Validation Error: page must be greater than 0");

    let params: issue::UpdateIssueParams =
        serde_json::from_value(json!({ "project_id": 1, "issue_iid": 4 })).unwrap();
    let result = issue::update_issue(&client, params).await.unwrap();
    assert_eq!(
        result_text(&result),
        "Validation Error: at least one field to update must be provided"
    );

    let params: merge_request::UpdateMergeRequestParams = serde_json::from_value(json!({
        "project_id": 1,
        "merge_request_iid": 8,
        "title": "  "
    }))
    .unwrap();
    let result = merge_request::update_merge_request(&client, params).await.unwrap();
    assert_eq!(result_text(&result), "Validation Error: title must not be empty");

    let params = search::SearchParams {
        resource_type: SearchResourceType::Commits,
        search: "fix".to_string(),
        scope: SearchScope::Group,
        group_id: Some(ProjectRef::new("my-group")),
        project_id: None,
        page: PageParams::default(),
    };
    let result = search::search(&client, params).await.unwrap();
    assert_eq!(
        result_text(&result),
        "Validation Error: commits search only supports global or project scope"
    );

    get_mock.assert_async().await;
    put_mock.assert_async().await;
}

#[tokio::test]
async fn test_project_search_returns_plain_array() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("GET", "/api/v4/projects/9/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("scope".into(), "merge_requests".into()),
            Matcher::UrlEncoded("search".into(), "login".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"iid": 3, "title": "Fix login"}]"#)
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params: search::SearchParams = serde_json::from_value(json!({
        "resource_type": "merge_requests",
        "search": "login",
        "scope": "project",
        "project_id": 9
    }))
    .unwrap();
    let result = search::search(&client, params).await.unwrap();

    assert_eq!(result_json(&result), json!([{"iid": 3, "title": "Fix login"}]));
}

#[tokio::test]
async fn test_delete_repository_tag_confirms() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("DELETE", "/api/v4/projects/1/repository/tags/v1.0.0")
        .with_status(204)
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params = tag::TagParams {
        project_id: ProjectRef::new("1"),
        tag_name: "v1.0.0".to_string(),
    };
    let result = tag::delete_repository_tag(&client, params).await.unwrap();

    assert_eq!(
        result_text(&result),
        r#"{"message":"Tag \"v1.0.0\" successfully deleted from project \"1\""}"#
    );
}

#[tokio::test]
async fn test_security_findings_from_latest_pipeline() {
    let mut server = start_mock_gitlab().await;
    let response = json!({
        "data": {
            "project": {
                "pipelines": {
                    "nodes": [{
                        "securityReportFindings": {
                            "nodes": [{
                                "title": "SQL injection",
                                "severity": "HIGH",
                                "location": {"file": "app/db.py", "startLine": 42},
                                "identifiers": [{"name": "CWE-89", "url": null}]
                            }]
                        }
                    }]
                }
            }
        }
    });
    server
        .mock("POST", "/api/graphql")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"fullPath": "group/app"}
        })))
        .with_status(200)
        .with_body(response.to_string())
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params = security::ProjectPathParams {
        project_path: "group/app".to_string(),
    };
    let result = security::get_security_findings(&client, params, SecurityReportType::Sast)
        .await
        .unwrap();

    let findings = result_json(&result);
    assert_eq!(findings[0]["title"], "SQL injection");
    assert_eq!(findings[0]["location"]["startLine"], 42);
}

/// GraphQL errors arrive with HTTP 200 and carry no status, so they escalate.
#[tokio::test]
async fn test_graphql_errors_escalate() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("POST", "/api/graphql")
        .with_status(200)
        .with_body(r#"{"data": null, "errors": [{"message": "Field 'licenses' doesn't exist"}]}"#)
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params = security::ProjectPathParams {
        project_path: "group/app".to_string(),
    };
    let error = security::get_license_compliance(&client, params)
        .await
        .unwrap_err();

    assert!(error.message.contains("Field 'licenses' doesn't exist"));
    assert!(error.message.contains("(status: 500)"));
}

#[tokio::test]
async fn test_list_users_envelope_drops_profile_links() {
    let mut server = start_mock_gitlab().await;
    server
        .mock("GET", "/api/v4/users")
        .match_query(Matcher::UrlEncoded("search".into(), "bo".into()))
        .with_status(200)
        .with_body(
            json!([{
                "id": 3,
                "username": "bob",
                "name": "Bob",
                "state": "active",
                "web_url": "https://gitlab.example.com/bob",
                "avatar_url": "https://gitlab.example.com/bob.png"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let client = create_test_gitlab_client(&server);
    let params = user::ListUsersParams {
        search: Some("bo".to_string()),
        ..Default::default()
    };
    let result = user::list_users(&client, params).await.unwrap();
    let envelope = result_json(&result);

    assert_eq!(envelope["items"][0]["username"], "bob");
    assert!(envelope["items"][0].get("web_url").is_none());
    assert!(envelope.get("pagination").is_none());
}
