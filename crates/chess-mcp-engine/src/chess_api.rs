//! Move recommendation over the chess-api.com HTTP interface

use async_trait::async_trait;
use chess_mcp_core::{ChessError, Result};
use chess_mcp_server::{MoveRecommender, Recommendation, SearchOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Evaluation reported for a forced mate, in pawns
pub const MATE_EVALUATION: f64 = 100.0;

/// Configuration for the recommendation client
#[derive(Debug, Clone)]
pub struct ChessApiConfig {
    /// Endpoint accepting `POST {fen, depth, maxThinkingTime}`
    pub base_url: String,
    /// Deadline for one request
    pub timeout: Duration,
}

impl Default for ChessApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://chess-api.com/v1".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChessApiRequest<'a> {
    fen: &'a str,
    depth: u32,
    max_thinking_time: u64,
}

/// Response body; only the fields this client reads
#[derive(Debug, Default, Deserialize)]
struct ChessApiResponse {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
    #[serde(rename = "move")]
    mv: Option<String>,
    san: Option<String>,
    eval: Option<f64>,
    mate: Option<i32>,
}

impl ChessApiResponse {
    fn into_recommendation(self) -> Result<Recommendation> {
        if self.kind.as_deref() == Some("error") {
            return Err(ChessError::RecommendationUnavailable(
                self.text.unwrap_or_else(|| "service reported an error".to_string()),
            ));
        }

        let evaluation = match (self.eval, self.mate) {
            (_, Some(mate)) if mate > 0 => MATE_EVALUATION,
            (_, Some(mate)) if mate < 0 => -MATE_EVALUATION,
            (Some(eval), _) => eval,
            (None, _) => 0.0,
        };

        Ok(Recommendation {
            mv: self.mv,
            san: self.san,
            evaluation,
            mate: self.mate,
        })
    }
}

/// HTTP client for a chess-api.com compatible service
pub struct ChessApiClient {
    http: reqwest::Client,
    config: ChessApiConfig,
}

impl ChessApiClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ChessApiConfig::default())
    }

    pub fn with_config(config: ChessApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("chess-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChessError::Http(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl MoveRecommender for ChessApiClient {
    async fn recommend(&self, fen: &str, options: SearchOptions) -> Result<Recommendation> {
        let body = ChessApiRequest {
            fen,
            depth: options.depth,
            max_thinking_time: options.max_thinking_time_ms,
        };
        debug!(fen, depth = options.depth, "Requesting recommendation");

        let response = self
            .http
            .post(&self.config.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChessError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Recommendation service returned an error status");
            return Err(ChessError::RecommendationUnavailable(format!(
                "service returned {}",
                status
            )));
        }

        let parsed: ChessApiResponse = response
            .json()
            .await
            .map_err(|e| ChessError::Serialization(e.to_string()))?;
        let recommendation = parsed.into_recommendation()?;
        debug!(mv = ?recommendation.mv, eval = recommendation.evaluation, "Recommendation received");
        Ok(recommendation)
    }
}
