//! chess-mcp server
//!
//! Serves the chess MCP tools over stdio (one session per connection) or
//! HTTP (sessions keyed by the `Mcp-Session-Id` header).

use anyhow::Result;
use chess_mcp_engine::{
    ChatCommentaryClient, ChessApiClient, ChessApiConfig, ChessComClient, ChessComConfig,
    CommentaryConfig,
};
use chess_mcp_server::{SearchOptions, ServerConfig, ServerFactory, Services, SessionConfig};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Parser)]
#[command(name = "chess-mcp", version, about = "Chess MCP server")]
struct Args {
    /// Transport to serve on
    #[arg(long, value_enum, env = "CHESS_MCP_TRANSPORT", default_value = "stdio")]
    transport: Transport,

    /// Listen address for the HTTP transport
    #[arg(long, env = "CHESS_MCP_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Session id for stdio, and the fallback for HTTP requests without one
    #[arg(long, env = "CHESS_MCP_SESSION", default_value = "default")]
    session: String,

    /// Move recommendation endpoint
    #[arg(long, env = "CHESS_MCP_ENGINE_URL", default_value = "https://chess-api.com/v1")]
    engine_url: String,

    /// Search depth sent with recommendation requests
    #[arg(long, env = "CHESS_MCP_DEPTH", default_value_t = 12)]
    depth: u32,

    /// Thinking time sent with recommendation requests, in milliseconds
    #[arg(long, env = "CHESS_MCP_THINK_MS", default_value_t = 50)]
    think_ms: u64,

    /// Player statistics API base URL
    #[arg(long, env = "CHESS_MCP_STATS_URL", default_value = "https://api.chess.com")]
    stats_url: String,

    /// Timeout for outbound HTTP requests, in seconds
    #[arg(long, env = "CHESS_MCP_HTTP_TIMEOUT", default_value_t = 15)]
    http_timeout: u64,

    /// Maximum live sessions (unbounded when unset)
    #[arg(long, env = "CHESS_MCP_MAX_SESSIONS")]
    max_sessions: Option<u64>,

    /// Evict sessions idle for this many seconds (never when unset)
    #[arg(long, env = "CHESS_MCP_IDLE_TIMEOUT")]
    idle_timeout: Option<u64>,

    /// Chat completions base URL for move commentary (disabled when unset)
    #[arg(long, env = "CHESS_MCP_COMMENTARY_URL")]
    commentary_url: Option<String>,

    /// Model name sent to the commentary service
    #[arg(long, env = "CHESS_MCP_COMMENTARY_MODEL", default_value = "local-model")]
    commentary_model: String,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            default_session: self.session.clone(),
            search: SearchOptions {
                depth: self.depth,
                max_thinking_time_ms: self.think_ms,
            },
            sessions: SessionConfig {
                max_sessions: self.max_sessions,
                idle_timeout: self.idle_timeout.map(Duration::from_secs),
            },
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the protocol on stdio
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let timeout = Duration::from_secs(args.http_timeout);

    let recommender = ChessApiClient::with_config(ChessApiConfig {
        base_url: args.engine_url.clone(),
        timeout,
    })?;
    let stats = ChessComClient::with_config(ChessComConfig {
        base_url: args.stats_url.clone(),
        timeout,
        ..ChessComConfig::default()
    })?;

    let mut services =
        Services::new(args.server_config(), Arc::new(recommender), Arc::new(stats));
    if let Some(url) = &args.commentary_url {
        let commentary = ChatCommentaryClient::with_config(CommentaryConfig {
            base_url: url.clone(),
            model: args.commentary_model.clone(),
            ..CommentaryConfig::default()
        })?;
        info!(url = %url, "Move commentary enabled");
        services = services.with_commentary(Arc::new(commentary));
    }
    let factory = ServerFactory::from_services(services);

    info!(transport = ?args.transport, engine = %args.engine_url, "chess-mcp starting");

    match args.transport {
        Transport::Stdio => factory.run_stdio(Some(args.session)).await?,
        Transport::Http => factory.run_http(args.bind).await?,
    }

    Ok(())
}
