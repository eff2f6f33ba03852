use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt};

use gitlab_insight::config::{ConfigOverrides, ServerConfig};
use gitlab_insight::transport::http_server::{DEFAULT_HTTP_ADDRESS, HttpServerApp};

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "GitLab Insight MCP Server - Model Context Protocol server for GitLab projects, issues, merge requests and security findings"
)]
#[command(
    long_about = "GitLab Insight MCP Server exposes the GitLab REST and GraphQL APIs as MCP tools: projects, branches, commits and tags, issues and merge requests with their comments, milestones, users, search, and security scan results. Tools are grouped into toolsets that can be restricted at startup, limited to read-only operations, or enabled on demand by the agent. Supports stdio and streamable HTTP transports."
)]
#[command(propagate_version = true)]
#[command(disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server in stdin/stdout mode for MCP client integration like Claude Desktop
    Stdio {
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Run the server over streamable HTTP at /mcp
    Http {
        /// Address to bind the HTTP server to
        #[arg(short, long, default_value = DEFAULT_HTTP_ADDRESS)]
        address: String,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args)]
struct ServerArgs {
    /// Enable debug logging for troubleshooting and development
    #[arg(short, long)]
    debug: bool,

    /// GitLab personal access token (overrides GITLAB_TOKEN environment variable)
    #[arg(short = 't', long)]
    gitlab_token: Option<String>,

    /// GitLab host, e.g. "gitlab.example.com" (default: https://gitlab.com; overrides GITLAB_HOST)
    #[arg(long)]
    gitlab_host: Option<String>,

    /// Comma-separated toolsets to enable: projects, issues, merge_requests, security, users, search or all (overrides GITLAB_TOOLSETS)
    #[arg(long)]
    toolsets: Option<String>,

    /// Expose only read-only tools
    #[arg(long)]
    read_only: bool,

    /// Start with every toolset disabled and let the agent enable them on demand
    #[arg(long)]
    dynamic_toolsets: bool,

    /// Timeout in seconds for each GitLab API request (default: 30)
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a TOML config file (default: <config dir>/gitlab-insight/config.toml)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

impl ServerArgs {
    fn into_config(self) -> Result<ServerConfig> {
        let overrides = ConfigOverrides {
            token: self.gitlab_token,
            host: self.gitlab_host,
            toolsets: self.toolsets,
            read_only: self.read_only,
            dynamic_toolsets: self.dynamic_toolsets,
            timeout_secs: self.timeout,
            debug: self.debug,
            config_path: self.config,
        };
        Ok(ServerConfig::load(overrides)?)
    }
}

/// Logs go to stderr so they never mix with the stdio protocol stream.
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},gitlab_insight={}", level, level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false) // Disable ANSI color codes
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stdio { server } => {
            let config = server.into_config()?;
            init_tracing(&config.log_level);
            log_startup(&config);

            gitlab_insight::transport::stdio::run_stdio_server(&config).await
        }
        Commands::Http { address, server } => {
            let config = server.into_config()?;
            init_tracing(&config.log_level);
            log_startup(&config);

            let addr: SocketAddr = address
                .parse()
                .with_context(|| format!("Invalid bind address '{}'", address))?;

            let app = HttpServerApp::new(addr, &config)?;
            app.serve().await
        }
    }
}

fn log_startup(config: &ServerConfig) {
    tracing::info!(
        "Starting GitLab Insight MCP server v{} for {}",
        env!("CARGO_PKG_VERSION"),
        config.host.as_deref().unwrap_or(gitlab_insight::gitlab::DEFAULT_GITLAB_HOST)
    );
    tracing::debug!("Resolved configuration: {:?}", config);
}
