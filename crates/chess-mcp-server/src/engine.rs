//! Collaborator seams: move recommendation, player statistics and commentary
//!
//! Implement these traits to plug a recommendation service, statistics
//! backend or commentary generator into the server. Both are called from tool handlers and may
//! suspend on network I/O.

use async_trait::async_trait;
use chess_mcp_core::{MoveAnalysis, Result};
use serde::{Deserialize, Serialize};

/// Search limits passed to the recommendation service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub depth: u32,
    pub max_thinking_time_ms: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: 12,
            max_thinking_time_ms: 50,
        }
    }
}

/// A recommended move with the evaluation of the position it was asked about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// Coordinate notation, e.g. `e2e4`
    pub mv: Option<String>,
    /// Algebraic notation, e.g. `e4`
    pub san: Option<String>,
    /// Evaluation in pawns from White's point of view
    pub evaluation: f64,
    /// Moves to mate, when the service reports one
    pub mate: Option<i32>,
}

impl Recommendation {
    /// Move to play, preferring coordinate notation
    pub fn best_move(&self) -> Option<&str> {
        self.mv
            .as_deref()
            .or(self.san.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Move to show a human, preferring algebraic notation
    pub fn display_move(&self) -> Option<String> {
        self.san
            .as_deref()
            .or(self.mv.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

/// Remote "best move" oracle
#[async_trait]
pub trait MoveRecommender: Send + Sync + 'static {
    /// Recommend a move for `fen`. A response without a move is not an error
    /// here; callers decide what a missing move means.
    async fn recommend(&self, fen: &str, options: SearchOptions) -> Result<Recommendation>;
}

/// Rating summary for one time control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub time_class: String,
    pub current: Option<u32>,
    pub best: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// Player statistics across time controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub username: String,
    pub ratings: Vec<RatingSummary>,
}

impl PlayerStats {
    /// e.g. `hikaru: blitz 3200 (best 3300, 10W/2L/1D)`
    pub fn summary(&self) -> String {
        if self.ratings.is_empty() {
            return format!("{}: no rated games", self.username);
        }
        let parts: Vec<String> = self
            .ratings
            .iter()
            .map(|r| {
                let current = r
                    .current
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unrated".to_string());
                let best = r.best.map(|b| format!("best {}, ", b)).unwrap_or_default();
                format!(
                    "{} {} ({}{}W/{}L/{}D)",
                    r.time_class, current, best, r.wins, r.losses, r.draws
                )
            })
            .collect();
        format!("{}: {}", self.username, parts.join("; "))
    }
}

/// External player-statistics service
#[async_trait]
pub trait StatsProvider: Send + Sync + 'static {
    async fn player_stats(&self, username: &str) -> Result<PlayerStats>;
}

/// Everything a commentator is told about one analysed move
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryRequest {
    /// Position the move was played from
    pub fen: String,
    pub move_san: String,
    /// `White` or `Black`
    pub side: String,
    /// Quality tag, e.g. `Inaccuracy`
    pub tag: String,
    pub best_alt: Option<String>,
    /// Centipawn change, e.g. `27->21 (Δ=-6)`
    pub cp: String,
}

impl CommentaryRequest {
    pub fn from_analysis(fen: impl Into<String>, analysis: &MoveAnalysis) -> Self {
        Self {
            fen: fen.into(),
            move_san: analysis.played_move.san.clone(),
            side: analysis.side.to_string(),
            tag: analysis.quality.to_string(),
            best_alt: analysis.best_alternative.clone(),
            cp: analysis.eval_change.clone(),
        }
    }
}

/// Natural-language commentary on an analysed move
#[async_trait]
pub trait CommentaryProvider: Send + Sync + 'static {
    async fn commentary(&self, request: &CommentaryRequest) -> Result<String>;
}
