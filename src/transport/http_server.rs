use std::net::SocketAddr;

use anyhow::{Context, Result};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};

use crate::config::ServerConfig;
use crate::gitlab::GitLabClient;
use crate::tools::{GitLabInsightTools, registry};
use crate::toolsets::ToolsetGroup;

/// Path the MCP endpoint is mounted on
pub const MCP_PATH: &str = "/mcp";

/// Default bind address of the HTTP transport
pub const DEFAULT_HTTP_ADDRESS: &str = "127.0.0.1:8080";

pub struct HttpServerApp {
    bind_addr: SocketAddr,
    client: GitLabClient,
    toolsets: ToolsetGroup,
    dynamic_mode: bool,
}

impl HttpServerApp {
    /// Creates a new HTTP server application instance.
    ///
    /// The toolset configuration is validated here so a bad toolset name fails
    /// before the listener is bound.
    pub fn new(bind_addr: SocketAddr, config: &ServerConfig) -> Result<Self> {
        let client = GitLabClient::new(
            Some(config.token.clone()),
            config.host.as_deref(),
            Some(config.request_timeout()),
        )?;
        let toolsets = registry::init_toolsets(
            &config.toolsets,
            config.read_only,
            config.dynamic_toolsets,
        )
        .context("Invalid toolset configuration")?;

        Ok(Self {
            bind_addr,
            client,
            toolsets,
            dynamic_mode: config.dynamic_toolsets,
        })
    }

    /// Builds the per-session server. Each session starts from the configured
    /// toolset state, so runtime enablement stays local to that session.
    fn session_server(&self) -> GitLabInsightTools {
        GitLabInsightTools::with_client(self.client.clone(), self.toolsets.clone(), self.dynamic_mode)
    }

    /// Serves the tools over streamable HTTP at `/mcp` until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails while
    /// running.
    pub async fn serve(self) -> Result<()> {
        self.session_server().verify_token().await;

        let bind_addr = self.bind_addr;
        let service_factory = move || -> Result<GitLabInsightTools, std::io::Error> {
            Ok(self.session_server())
        };

        let service = StreamableHttpService::new(
            service_factory,
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig {
                stateful_mode: true,
                ..Default::default()
            },
        );

        let router = axum::Router::new().nest_service(MCP_PATH, service);
        let listener = tokio::net::TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", bind_addr))?;

        tracing::info!("GitLab Insight MCP server listening on http://{}{}", bind_addr, MCP_PATH);

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for shutdown signal: {}", e);
                }
                tracing::info!("Shutting down HTTP server");
            })
            .await?;

        Ok(())
    }
}
