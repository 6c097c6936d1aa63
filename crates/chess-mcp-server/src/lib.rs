//! # chess-mcp-server
//!
//! MCP server exposing a chess game to web clients and agents.
//!
//! This crate provides:
//! - `SessionStore`, the session-keyed game store
//! - `ServerFactory`, which builds a `ChessServer` bound to one session per request
//! - MCP JSON-RPC protocol handling
//! - Resource and tool catalog plus tool handlers
//! - `MoveRecommender` / `StatsProvider` / `CommentaryProvider` traits for external services
//! - stdio and HTTP transports

pub mod capabilities;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod mcp;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ServerConfig, SessionConfig};
pub use engine::{
    CommentaryProvider, CommentaryRequest, MoveRecommender, PlayerStats, RatingSummary,
    Recommendation, SearchOptions, StatsProvider,
};
pub use session::{GameHandle, SessionStore};

use chess_mcp_core::{OpeningCatalog, PuzzleCatalog, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Everything a server needs besides its session: configuration,
/// collaborators and catalogs. Built once at startup.
pub struct Services {
    pub config: ServerConfig,
    pub recommender: Arc<dyn MoveRecommender>,
    pub stats: Arc<dyn StatsProvider>,
    /// Attaches commentary to analyzeLastMove results when set
    pub commentary: Option<Arc<dyn CommentaryProvider>>,
    pub puzzles: PuzzleCatalog,
    pub openings: OpeningCatalog,
}

impl Services {
    /// Services using the built-in catalogs
    pub fn new(
        config: ServerConfig,
        recommender: Arc<dyn MoveRecommender>,
        stats: Arc<dyn StatsProvider>,
    ) -> Self {
        Self {
            config,
            recommender,
            stats,
            commentary: None,
            puzzles: PuzzleCatalog::builtin().clone(),
            openings: OpeningCatalog::builtin().clone(),
        }
    }

    pub fn with_commentary(mut self, commentary: Arc<dyn CommentaryProvider>) -> Self {
        self.commentary = Some(commentary);
        self
    }
}

/// Builds per-request servers over a shared session store
#[derive(Clone)]
pub struct ServerFactory {
    store: Arc<SessionStore>,
    services: Arc<Services>,
}

impl ServerFactory {
    pub fn new(store: Arc<SessionStore>, services: Arc<Services>) -> Self {
        Self { store, services }
    }

    /// Factory with a store bounded per `services.config.sessions`
    pub fn from_services(services: Services) -> Self {
        let store = SessionStore::with_config(&services.config.sessions);
        Self::new(Arc::new(store), Arc::new(services))
    }

    /// Server bound to `session_id`, or to the configured default session
    pub fn new_server(&self, session_id: Option<&str>) -> ChessServer {
        let session_id = session_id
            .unwrap_or(&self.services.config.default_session)
            .to_string();
        let game = self.store.get(&session_id);
        ChessServer {
            session_id,
            game,
            services: self.services.clone(),
        }
    }

    /// Run on the stdio transport; the whole connection is one session
    pub async fn run_stdio(self, session_id: Option<String>) -> Result<()> {
        transport::stdio::run(self, session_id).await
    }

    /// Run on the HTTP transport
    pub async fn run_http(self, addr: SocketAddr) -> Result<()> {
        transport::http::serve(self, addr).await
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }
}

/// Chess MCP server bound to one session's game
pub struct ChessServer {
    session_id: String,
    game: GameHandle,
    services: Arc<Services>,
}

impl ChessServer {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn game(&self) -> &GameHandle {
        &self.game
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}
