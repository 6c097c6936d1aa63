//! Server configuration

use std::time::Duration;

use crate::engine::SearchOptions;

/// Session id used when the transport supplies none
pub const DEFAULT_SESSION: &str = "default";

/// Configuration for the protocol server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Name reported in `initialize`
    pub name: String,
    /// Version reported in `initialize`
    pub version: String,
    /// Session id used when the transport supplies none
    pub default_session: String,
    /// Limits for recommendation requests
    pub search: SearchOptions,
    /// Session store bounds
    pub sessions: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "chess-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            default_session: DEFAULT_SESSION.to_string(),
            search: SearchOptions::default(),
            sessions: SessionConfig::default(),
        }
    }
}

/// Bounds for the session store. `None` means unbounded.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Maximum live sessions; least recently used are evicted first
    pub max_sessions: Option<u64>,
    /// Evict sessions untouched for this long
    pub idle_timeout: Option<Duration>,
}
