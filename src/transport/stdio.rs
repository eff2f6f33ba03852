use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;

use crate::config::ServerConfig;
use crate::tools::GitLabInsightTools;

/// Runs the MCP server in STDIN/STDOUT mode.
///
/// This mode is used when the server is launched as a subprocess by an MCP client,
/// communicating through standard input/output streams. Logs must go to stderr.
///
/// # Example
/// ```no_run
/// # use gitlab_insight::config::{ConfigOverrides, ServerConfig};
/// # use gitlab_insight::transport::stdio::run_stdio_server;
/// # async fn example() -> anyhow::Result<()> {
/// let config = ServerConfig::load(ConfigOverrides {
///     token: Some("glpat-xxxxxxxxxxxx".to_string()),
///     ..Default::default()
/// })?;
/// run_stdio_server(&config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_stdio_server(config: &ServerConfig) -> Result<()> {
    let service = GitLabInsightTools::new(config)?;
    service.verify_token().await;

    let server = service.serve(stdio()).await?;

    server.waiting().await?;
    Ok(())
}
