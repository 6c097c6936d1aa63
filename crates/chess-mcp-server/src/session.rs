//! Session-keyed game store

use chess_mcp_core::ChessGame;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::SessionConfig;

/// Shared handle to one session's game
pub type GameHandle = Arc<Mutex<ChessGame>>;

/// Maps session ids to games, creating a fresh game on first access.
///
/// Unbounded unless configured otherwise.
pub struct SessionStore {
    sessions: Cache<String, GameHandle>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    /// Store with optional capacity and idle bounds
    pub fn with_config(config: &SessionConfig) -> Self {
        let mut builder =
            Cache::<String, GameHandle>::builder().eviction_policy(EvictionPolicy::lru());
        if let Some(max) = config.max_sessions {
            builder = builder.max_capacity(max);
        }
        if let Some(idle) = config.idle_timeout {
            builder = builder.time_to_idle(idle);
        }
        Self {
            sessions: builder.build(),
        }
    }

    /// Game for `session_id`, created at the starting position if absent
    pub fn get(&self, session_id: &str) -> GameHandle {
        self.sessions.get_with(session_id.to_string(), || {
            debug!(session = session_id, "Creating new game session");
            Arc::new(Mutex::new(ChessGame::new()))
        })
    }

    /// Drop a session; the next `get` starts a new game
    pub fn remove(&self, session_id: &str) -> Option<GameHandle> {
        self.sessions.remove(session_id)
    }

    /// Number of live sessions
    pub fn len(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
