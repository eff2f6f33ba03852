//! MCP (Model Context Protocol) tool implementations for GitLab Insight
//!
//! This module provides the MCP server interface, exposing the GitLab REST and
//! GraphQL APIs as tools that can be used by AI assistants and other MCP clients.
//!
//! ## Features
//!
//! - Projects, branches, commits and repository tags
//! - Issues, merge requests, comments, labels and milestones
//! - Users, search and security scan findings
//! - Toolsets that can be restricted at startup or enabled at runtime

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, Peer, RoleServer, ServerHandler, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::gitlab::GitLabClient;
use crate::toolsets::{ToolsetError, ToolsetGroup};
use crate::types::SecurityReportType;

/// Classification of API failures into tool results
pub mod error;

/// Tool function implementations organized by functionality
pub mod functions;

/// Toolset catalogue
pub mod registry;

use error::{tool_error_result, validation_error};
use functions::{issue, merge_request, milestone, project, search, security, tag, user};
use registry::DISCOVERY_TOOLS;

const SERVER_INSTRUCTIONS: &str = "GitLab Insight MCP Server. Read and manage GitLab projects, issues, merge requests, milestones, repository tags and users, search GitLab, and inspect security scan results. Projects are referenced by numeric ID or full path such as \"group/project\". List tools accept page and per_page (max 100).";

const DYNAMIC_INSTRUCTIONS: &str = " Toolsets are disabled at start: call list_available_toolsets, then enable_toolset to make their tools available.";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EnableToolsetParams {
    #[schemars(description = "Name of the toolset to enable, as shown by list_available_toolsets")]
    pub toolset: String,
}

/// GitLab tools exposed through the MCP protocol.
///
/// Only tools of enabled toolsets are listed and callable. In read-only mode
/// mutating tools are hidden as well.
#[derive(Clone)]
pub struct GitLabInsightTools {
    client: GitLabClient,
    toolsets: Arc<RwLock<ToolsetGroup>>,
    dynamic_mode: bool,
    tool_router: ToolRouter<Self>,
}

impl GitLabInsightTools {
    /// Builds the client and enables the configured toolsets.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = GitLabClient::new(
            Some(config.token.clone()),
            config.host.as_deref(),
            Some(config.request_timeout()),
        )?;
        let group = registry::init_toolsets(
            &config.toolsets,
            config.read_only,
            config.dynamic_toolsets,
        )
        .context("Invalid toolset configuration")?;

        tracing::info!(
            "Toolsets: {} (read-only: {}, dynamic: {})",
            config.toolsets.join(","),
            config.read_only,
            config.dynamic_toolsets
        );

        Ok(Self::with_client(client, group, config.dynamic_toolsets))
    }

    pub fn with_client(client: GitLabClient, toolsets: ToolsetGroup, dynamic_mode: bool) -> Self {
        Self {
            client,
            toolsets: Arc::new(RwLock::new(toolsets)),
            dynamic_mode,
            tool_router: Self::tool_router(),
        }
    }

    pub fn client(&self) -> &GitLabClient {
        &self.client
    }

    /// Checks the token against `GET /user`. Failure is logged, never fatal.
    pub async fn verify_token(&self) {
        match self.client.current_user().await {
            Ok(response) => tracing::info!(
                "Authenticated to {} as {}",
                self.client.api_base(),
                response.data.username
            ),
            Err(e) => tracing::warn!(
                "GitLab token check failed ({}); tool calls may fail until the token is fixed",
                e
            ),
        }
    }

    /// Every tool the router knows about, live or not
    pub fn registered_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Tools currently listed to clients
    pub async fn available_tools(&self) -> Vec<Tool> {
        let group = self.toolsets.read().await;
        self.tool_router
            .list_all()
            .into_iter()
            .filter(|tool| self.is_live(&group, &tool.name))
            .collect()
    }

    pub async fn is_tool_available(&self, name: &str) -> bool {
        let group = self.toolsets.read().await;
        self.is_live(&group, name)
    }

    fn is_live(&self, group: &ToolsetGroup, name: &str) -> bool {
        if DISCOVERY_TOOLS.contains(&name) {
            return self.dynamic_mode;
        }
        group.is_tool_active(name)
    }

    /// Enables a toolset at runtime.
    pub async fn activate_toolset(&self, name: &str) -> Result<(), ToolsetError> {
        let mut group = self.toolsets.write().await;
        group.enable_toolset(name)?;
        tracing::info!("Enabled toolset '{}'", name);
        Ok(())
    }

    /// Text listing of every toolset and its state
    pub async fn toolsets_overview(&self) -> String {
        let group = self.toolsets.read().await;
        let infos = group.list_toolsets();
        let mut text = format!("Available Toolsets ({}):", infos.len());
        for info in infos {
            text.push_str(&format!(
                "\n- {}: {} [{} tools] ({})",
                info.name,
                info.description,
                info.tool_count,
                if info.enabled { "enabled" } else { "disabled" }
            ));
        }
        text
    }
}

#[tool_router]
impl GitLabInsightTools {
    // Toolset discovery

    #[tool(
        description = "List all toolsets with their descriptions, tool counts and whether they are enabled. Use enable_toolset to turn one on.",
        annotations(title = "List Available Toolsets", read_only_hint = true)
    )]
    async fn list_available_toolsets(&self) -> Result<CallToolResult, McpError> {
        Ok(functions::text_result(self.toolsets_overview().await))
    }

    #[tool(
        description = "Enable a toolset so its tools become available. Example: {\"toolset\": \"issues\"}",
        annotations(title = "Enable Toolset", read_only_hint = false)
    )]
    async fn enable_toolset(
        &self,
        Parameters(params): Parameters<EnableToolsetParams>,
        peer: Peer<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = params.toolset.trim();
        if name.is_empty() {
            return Ok(validation_error("toolset must not be empty"));
        }

        match self.activate_toolset(name).await {
            Ok(()) => {
                if let Err(e) = peer.notify_tool_list_changed().await {
                    tracing::warn!("Failed to send tool list change notification: {}", e);
                }
                Ok(functions::text_result(format!(
                    "Successfully enabled toolset '{}'. Tools are now available.",
                    name
                )))
            }
            Err(e) => Ok(tool_error_result(format!(
                "Failed to enable toolset '{}': {}",
                name, e
            ))),
        }
    }

    // Projects and repository

    #[tool(
        description = "Get a single project by ID or full path. Example: {\"project_id\": \"group/project\"}",
        annotations(title = "Get Project", read_only_hint = true)
    )]
    async fn get_project(
        &self,
        Parameters(params): Parameters<project::GetProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        project::get_project(&self.client, params).await
    }

    #[tool(
        description = "List projects visible to the current user, optionally filtered by search term, membership, ownership, visibility or archive state. Returns {items, pagination}.",
        annotations(title = "List Projects", read_only_hint = true)
    )]
    async fn list_projects(
        &self,
        Parameters(params): Parameters<project::ListProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        project::list_projects(&self.client, params).await
    }

    #[tool(
        description = "List repository branches of a project, optionally filtered by name.",
        annotations(title = "List Project Branches", read_only_hint = true)
    )]
    async fn list_project_branches(
        &self,
        Parameters(params): Parameters<project::ListProjectBranchesParams>,
    ) -> Result<CallToolResult, McpError> {
        project::list_project_branches(&self.client, params).await
    }

    #[tool(
        description = "List repository commits of a project, optionally on a branch or tag, in a time range, for a file path or by author. Returns {items, pagination}.",
        annotations(title = "List Project Commits", read_only_hint = true)
    )]
    async fn list_project_commits(
        &self,
        Parameters(params): Parameters<project::ListProjectCommitsParams>,
    ) -> Result<CallToolResult, McpError> {
        project::list_project_commits(&self.client, params).await
    }

    #[tool(
        description = "List repository tags of a project.",
        annotations(title = "List Repository Tags", read_only_hint = true)
    )]
    async fn list_repository_tags(
        &self,
        Parameters(params): Parameters<tag::ListRepositoryTagsParams>,
    ) -> Result<CallToolResult, McpError> {
        tag::list_repository_tags(&self.client, params).await
    }

    #[tool(
        description = "Get a single repository tag. Example: {\"project_id\": 42, \"tag_name\": \"v1.2.0\"}",
        annotations(title = "Get Repository Tag", read_only_hint = true)
    )]
    async fn get_repository_tag(
        &self,
        Parameters(params): Parameters<tag::TagParams>,
    ) -> Result<CallToolResult, McpError> {
        tag::get_repository_tag(&self.client, params).await
    }

    #[tool(
        description = "Get the release of a tag, including the commit the tag points to.",
        annotations(title = "Get Tag Commit", read_only_hint = true)
    )]
    async fn get_tag_commit(
        &self,
        Parameters(params): Parameters<tag::TagParams>,
    ) -> Result<CallToolResult, McpError> {
        tag::get_tag_commit(&self.client, params).await
    }

    #[tool(
        description = "Create a repository tag from a branch or commit. Example: {\"project_id\": 42, \"tag_name\": \"v1.3.0\", \"ref\": \"main\"}",
        annotations(title = "Create Repository Tag", read_only_hint = false)
    )]
    async fn create_repository_tag(
        &self,
        Parameters(params): Parameters<tag::CreateRepositoryTagParams>,
    ) -> Result<CallToolResult, McpError> {
        tag::create_repository_tag(&self.client, params).await
    }

    #[tool(
        description = "Delete a repository tag.",
        annotations(title = "Delete Repository Tag", read_only_hint = false, destructive_hint = true)
    )]
    async fn delete_repository_tag(
        &self,
        Parameters(params): Parameters<tag::TagParams>,
    ) -> Result<CallToolResult, McpError> {
        tag::delete_repository_tag(&self.client, params).await
    }

    // Issues and milestones

    #[tool(
        description = "Get a single issue by project and issue IID. Example: {\"project_id\": \"group/project\", \"issue_iid\": 12}",
        annotations(title = "Get Issue", read_only_hint = true)
    )]
    async fn get_issue(
        &self,
        Parameters(params): Parameters<issue::GetIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::get_issue(&self.client, params).await
    }

    #[tool(
        description = "List issues of a project with filters for state, labels, milestone, author, assignee, search text and dates. Long descriptions are truncated. Returns {items, pagination}.",
        annotations(title = "List Issues", read_only_hint = true)
    )]
    async fn list_issues(
        &self,
        Parameters(params): Parameters<issue::ListIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::list_issues(&self.client, params).await
    }

    #[tool(
        description = "List comments (notes) of an issue. Returns {items, pagination}.",
        annotations(title = "Get Issue Comments", read_only_hint = true)
    )]
    async fn get_issue_comments(
        &self,
        Parameters(params): Parameters<issue::GetIssueCommentsParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::get_issue_comments(&self.client, params).await
    }

    #[tool(
        description = "List labels defined in a project.",
        annotations(title = "Get Issue Labels", read_only_hint = true)
    )]
    async fn get_issue_labels(
        &self,
        Parameters(params): Parameters<issue::GetIssueLabelsParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::get_issue_labels(&self.client, params).await
    }

    #[tool(
        description = "Create an issue. Example: {\"project_id\": 42, \"title\": \"Crash on start\", \"labels\": [\"bug\"]}",
        annotations(title = "Create Issue", read_only_hint = false)
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<issue::CreateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::create_issue(&self.client, params).await
    }

    #[tool(
        description = "Update an issue. At least one field must be given. Use state_event \"close\" or \"reopen\" to change state.",
        annotations(title = "Update Issue", read_only_hint = false)
    )]
    async fn update_issue(
        &self,
        Parameters(params): Parameters<issue::UpdateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::update_issue(&self.client, params).await
    }

    #[tool(
        description = "Add a comment to an issue.",
        annotations(title = "Create Issue Comment", read_only_hint = false)
    )]
    async fn create_issue_comment(
        &self,
        Parameters(params): Parameters<issue::CreateIssueCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::create_issue_comment(&self.client, params).await
    }

    #[tool(
        description = "Edit an existing issue comment.",
        annotations(title = "Update Issue Comment", read_only_hint = false)
    )]
    async fn update_issue_comment(
        &self,
        Parameters(params): Parameters<issue::UpdateIssueCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        issue::update_issue_comment(&self.client, params).await
    }

    #[tool(
        description = "Get a single project milestone by ID.",
        annotations(title = "Get Milestone", read_only_hint = true)
    )]
    async fn get_milestone(
        &self,
        Parameters(params): Parameters<milestone::GetMilestoneParams>,
    ) -> Result<CallToolResult, McpError> {
        milestone::get_milestone(&self.client, params).await
    }

    #[tool(
        description = "List milestones of a project, optionally by state, title or search text. Returns {items, pagination}.",
        annotations(title = "List Milestones", read_only_hint = true)
    )]
    async fn list_milestones(
        &self,
        Parameters(params): Parameters<milestone::ListMilestonesParams>,
    ) -> Result<CallToolResult, McpError> {
        milestone::list_milestones(&self.client, params).await
    }

    #[tool(
        description = "Create a project milestone. Dates use YYYY-MM-DD.",
        annotations(title = "Create Milestone", read_only_hint = false)
    )]
    async fn create_milestone(
        &self,
        Parameters(params): Parameters<milestone::CreateMilestoneParams>,
    ) -> Result<CallToolResult, McpError> {
        milestone::create_milestone(&self.client, params).await
    }

    #[tool(
        description = "Update a project milestone. Use state_event \"close\" or \"activate\" to change state.",
        annotations(title = "Update Milestone", read_only_hint = false)
    )]
    async fn update_milestone(
        &self,
        Parameters(params): Parameters<milestone::UpdateMilestoneParams>,
    ) -> Result<CallToolResult, McpError> {
        milestone::update_milestone(&self.client, params).await
    }

    // Merge requests

    #[tool(
        description = "Get a single merge request by project and merge request IID.",
        annotations(title = "Get Merge Request", read_only_hint = true)
    )]
    async fn get_merge_request(
        &self,
        Parameters(params): Parameters<merge_request::GetMergeRequestParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::get_merge_request(&self.client, params).await
    }

    #[tool(
        description = "List merge requests of a project with filters for state, labels, branches, author, reviewer, draft status and dates. Returns {items, pagination}.",
        annotations(title = "List Merge Requests", read_only_hint = true)
    )]
    async fn list_merge_requests(
        &self,
        Parameters(params): Parameters<merge_request::ListMergeRequestsParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::list_merge_requests(&self.client, params).await
    }

    #[tool(
        description = "List comments (notes) of a merge request. Returns {items, pagination}.",
        annotations(title = "Get Merge Request Comments", read_only_hint = true)
    )]
    async fn get_merge_request_comments(
        &self,
        Parameters(params): Parameters<merge_request::GetMergeRequestCommentsParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::get_merge_request_comments(&self.client, params).await
    }

    #[tool(
        description = "Open a merge request. Example: {\"project_id\": 42, \"source_branch\": \"fix/crash\", \"target_branch\": \"main\", \"title\": \"Fix crash\"}",
        annotations(title = "Create Merge Request", read_only_hint = false)
    )]
    async fn create_merge_request(
        &self,
        Parameters(params): Parameters<merge_request::CreateMergeRequestParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::create_merge_request(&self.client, params).await
    }

    #[tool(
        description = "Update a merge request. At least one field must be given.",
        annotations(title = "Update Merge Request", read_only_hint = false)
    )]
    async fn update_merge_request(
        &self,
        Parameters(params): Parameters<merge_request::UpdateMergeRequestParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::update_merge_request(&self.client, params).await
    }

    #[tool(
        description = "Add a comment to a merge request.",
        annotations(title = "Create Merge Request Comment", read_only_hint = false)
    )]
    async fn create_merge_request_comment(
        &self,
        Parameters(params): Parameters<merge_request::CreateMergeRequestCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::create_merge_request_comment(&self.client, params).await
    }

    #[tool(
        description = "Edit an existing merge request comment.",
        annotations(title = "Update Merge Request Comment", read_only_hint = false)
    )]
    async fn update_merge_request_comment(
        &self,
        Parameters(params): Parameters<merge_request::UpdateMergeRequestCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        merge_request::update_merge_request_comment(&self.client, params).await
    }

    // Security

    #[tool(
        description = "Get static application security testing (SAST) findings from the latest pipeline. Example: {\"project_path\": \"group/project\"}",
        annotations(title = "Get Project SAST Findings", read_only_hint = true)
    )]
    async fn get_project_sast(
        &self,
        Parameters(params): Parameters<security::ProjectPathParams>,
    ) -> Result<CallToolResult, McpError> {
        security::get_security_findings(&self.client, params, SecurityReportType::Sast).await
    }

    #[tool(
        description = "Get dynamic application security testing (DAST) findings from the latest pipeline.",
        annotations(title = "Get Project DAST Findings", read_only_hint = true)
    )]
    async fn get_project_dast(
        &self,
        Parameters(params): Parameters<security::ProjectPathParams>,
    ) -> Result<CallToolResult, McpError> {
        security::get_security_findings(&self.client, params, SecurityReportType::Dast).await
    }

    #[tool(
        description = "Get dependency scanning findings from the latest pipeline.",
        annotations(title = "Get Project Dependency Scanning Findings", read_only_hint = true)
    )]
    async fn get_project_dependency_scanning(
        &self,
        Parameters(params): Parameters<security::ProjectPathParams>,
    ) -> Result<CallToolResult, McpError> {
        security::get_security_findings(&self.client, params, SecurityReportType::DependencyScanning)
            .await
    }

    #[tool(
        description = "Get container scanning findings from the latest pipeline.",
        annotations(title = "Get Project Container Scanning Findings", read_only_hint = true)
    )]
    async fn get_project_container_scanning(
        &self,
        Parameters(params): Parameters<security::ProjectPathParams>,
    ) -> Result<CallToolResult, McpError> {
        security::get_security_findings(&self.client, params, SecurityReportType::ContainerScanning)
            .await
    }

    #[tool(
        description = "Get secret detection findings from the latest pipeline.",
        annotations(title = "Get Project Secret Detection Findings", read_only_hint = true)
    )]
    async fn get_project_secret_detection(
        &self,
        Parameters(params): Parameters<security::ProjectPathParams>,
    ) -> Result<CallToolResult, McpError> {
        security::get_security_findings(&self.client, params, SecurityReportType::SecretDetection)
            .await
    }

    #[tool(
        description = "Get licenses detected in the project's dependencies.",
        annotations(title = "Get Project License Compliance", read_only_hint = true)
    )]
    async fn get_project_license_compliance(
        &self,
        Parameters(params): Parameters<security::ProjectPathParams>,
    ) -> Result<CallToolResult, McpError> {
        security::get_license_compliance(&self.client, params).await
    }

    // Users

    #[tool(
        description = "Get the user that owns the configured token.",
        annotations(title = "Get Current User", read_only_hint = true)
    )]
    async fn get_current_user(&self) -> Result<CallToolResult, McpError> {
        user::get_current_user(&self.client).await
    }

    #[tool(
        description = "Get a user by numeric ID.",
        annotations(title = "Get User", read_only_hint = true)
    )]
    async fn get_user(
        &self,
        Parameters(params): Parameters<user::UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        user::get_user(&self.client, params).await
    }

    #[tool(
        description = "Get the status message and availability of a user.",
        annotations(title = "Get User Status", read_only_hint = true)
    )]
    async fn get_user_status(
        &self,
        Parameters(params): Parameters<user::UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        user::get_user_status(&self.client, params).await
    }

    #[tool(
        description = "List users, optionally filtered by search text, username or active state. Returns {items, pagination}.",
        annotations(title = "List Users", read_only_hint = true)
    )]
    async fn list_users(
        &self,
        Parameters(params): Parameters<user::ListUsersParams>,
    ) -> Result<CallToolResult, McpError> {
        user::list_users(&self.client, params).await
    }

    #[tool(
        description = "List users that are members of a project. Returns {items, pagination}.",
        annotations(title = "List Project Users", read_only_hint = true)
    )]
    async fn list_project_users(
        &self,
        Parameters(params): Parameters<user::ListProjectUsersParams>,
    ) -> Result<CallToolResult, McpError> {
        user::list_project_users(&self.client, params).await
    }

    // Search

    #[tool(
        description = "Search GitLab for projects, issues, merge requests, blobs, commits, milestones, snippets, wiki pages or notes. Scope is global (default), group (needs group_id) or project (needs project_id). Example: {\"resource_type\": \"issues\", \"search\": \"timeout\", \"scope\": \"project\", \"project_id\": \"group/app\"}",
        annotations(title = "Search", read_only_hint = true)
    )]
    async fn search(
        &self,
        Parameters(params): Parameters<search::SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        search::search(&self.client, params).await
    }
}

impl ServerHandler for GitLabInsightTools {
    fn get_info(&self) -> ServerInfo {
        let mut instructions = SERVER_INSTRUCTIONS.to_string();
        if self.dynamic_mode {
            instructions.push_str(DYNAMIC_INSTRUCTIONS);
        }

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_tool_list_changed()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(instructions),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.available_tools().await))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.to_string();
        if !self.is_tool_available(&name).await {
            return Err(McpError::invalid_params(
                format!("tool '{}' is not available", name),
                None,
            ));
        }

        let cancellation = context.ct.clone();
        let tool_context = ToolCallContext::new(self, request, context);
        tracing::debug!("Calling tool {}", name);

        tokio::select! {
            result = self.tool_router.call(tool_context) => match result {
                // Argument decoding failures are reported back to the caller
                Err(error) if error.code == ErrorCode::INVALID_PARAMS => {
                    Ok(validation_error(error.message))
                }
                other => other,
            },
            _ = cancellation.cancelled() => {
                tracing::info!("Tool call {} cancelled by client", name);
                Err(McpError::internal_error(
                    format!("tool call '{}' was cancelled", name),
                    None,
                ))
            }
        }
    }
}
