//! Player statistics from the chess.com published-data API

use async_trait::async_trait;
use chess_mcp_core::{ChessError, Result};
use chess_mcp_server::{PlayerStats, RatingSummary, StatsProvider};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the statistics client
#[derive(Debug, Clone)]
pub struct ChessComConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// chess.com rejects requests without a User-Agent
    pub user_agent: String,
}

impl Default for ChessComConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chess.com".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: concat!("chess-mcp/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatsResponse {
    chess_rapid: Option<TimeClassStats>,
    chess_blitz: Option<TimeClassStats>,
    chess_bullet: Option<TimeClassStats>,
    chess_daily: Option<TimeClassStats>,
}

#[derive(Debug, Default, Deserialize)]
struct TimeClassStats {
    last: Option<RatingPoint>,
    best: Option<RatingPoint>,
    #[serde(default)]
    record: Record,
}

#[derive(Debug, Deserialize)]
struct RatingPoint {
    rating: u32,
}

#[derive(Debug, Default, Deserialize)]
struct Record {
    #[serde(default)]
    win: u32,
    #[serde(default)]
    loss: u32,
    #[serde(default)]
    draw: u32,
}

impl StatsResponse {
    fn into_player_stats(self, username: &str) -> PlayerStats {
        let ratings = [
            ("rapid", self.chess_rapid),
            ("blitz", self.chess_blitz),
            ("bullet", self.chess_bullet),
            ("daily", self.chess_daily),
        ]
        .into_iter()
        .filter_map(|(time_class, stats)| {
            stats.map(|s| RatingSummary {
                time_class: time_class.to_string(),
                current: s.last.map(|p| p.rating),
                best: s.best.map(|p| p.rating),
                wins: s.record.win,
                losses: s.record.loss,
                draws: s.record.draw,
            })
        })
        .collect();

        PlayerStats {
            username: username.to_string(),
            ratings,
        }
    }
}

/// Usernames are ASCII letters, digits, `_` and `-`
fn normalize_username(username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty()
        || !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ChessError::InvalidArguments(format!(
            "'{}' is not a valid chess.com username",
            username
        )));
    }
    Ok(username.to_ascii_lowercase())
}

/// HTTP client for `GET /pub/player/{username}/stats`
pub struct ChessComClient {
    http: reqwest::Client,
    config: ChessComConfig,
}

impl ChessComClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ChessComConfig::default())
    }

    pub fn with_config(config: ChessComConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ChessError::Http(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn stats_url(&self, username: &str) -> String {
        format!(
            "{}/pub/player/{}/stats",
            self.config.base_url.trim_end_matches('/'),
            username
        )
    }
}

#[async_trait]
impl StatsProvider for ChessComClient {
    async fn player_stats(&self, username: &str) -> Result<PlayerStats> {
        let username = normalize_username(username)?;
        let url = self.stats_url(&username);
        debug!(%url, "Fetching player stats");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChessError::Http(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ChessError::StatsUnavailable(format!(
                "player '{}' not found",
                username
            )));
        }
        if !status.is_success() {
            warn!(%status, "Stats service returned an error status");
            return Err(ChessError::StatsUnavailable(format!(
                "service returned {}",
                status
            )));
        }

        let parsed: StatsResponse = response
            .json()
            .await
            .map_err(|e| ChessError::Serialization(e.to_string()))?;
        Ok(parsed.into_player_stats(&username))
    }
}
