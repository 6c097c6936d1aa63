//! In-memory collaborators for tests

use async_trait::async_trait;
use chess_mcp_core::{ChessError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::engine::{
    CommentaryProvider, CommentaryRequest, MoveRecommender, PlayerStats, RatingSummary,
    Recommendation, SearchOptions, StatsProvider,
};
use crate::{ServerConfig, ServerFactory, Services};

/// Answers from a fixed table keyed by FEN and records every query
#[derive(Default)]
pub struct ScriptedRecommender {
    answers: HashMap<String, Recommendation>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRecommender {
    pub fn with(mut self, fen: &str, mv: Option<&str>, san: Option<&str>, evaluation: f64) -> Self {
        self.answers.insert(
            fen.to_string(),
            Recommendation {
                mv: mv.map(str::to_string),
                san: san.map(str::to_string),
                evaluation,
                mate: None,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MoveRecommender for ScriptedRecommender {
    async fn recommend(&self, fen: &str, _options: SearchOptions) -> Result<Recommendation> {
        self.calls.lock().unwrap().push(fen.to_string());
        self.answers
            .get(fen)
            .cloned()
            .ok_or_else(|| ChessError::Http(format!("no scripted answer for {}", fen)))
    }
}

/// Knows one player
pub struct FixedStats;

#[async_trait]
impl StatsProvider for FixedStats {
    async fn player_stats(&self, username: &str) -> Result<PlayerStats> {
        if username != "magnus" {
            return Err(ChessError::Http("404 Not Found".into()));
        }
        Ok(PlayerStats {
            username: username.to_string(),
            ratings: vec![RatingSummary {
                time_class: "blitz".into(),
                current: Some(3200),
                best: Some(3300),
                wins: 10,
                losses: 2,
                draws: 1,
            }],
        })
    }
}

/// Parks inside `recommend` until released, then answers with a fixed move
pub struct GatedRecommender {
    answer: Recommendation,
    entered: Notify,
    release: Notify,
}

impl GatedRecommender {
    pub fn new(mv: &str, san: &str) -> Self {
        Self {
            answer: Recommendation {
                mv: Some(mv.to_string()),
                san: Some(san.to_string()),
                evaluation: 0.0,
                mate: None,
            },
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Resolves once a caller is parked inside `recommend`
    pub async fn wait_until_called(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl MoveRecommender for GatedRecommender {
    async fn recommend(&self, _fen: &str, _options: SearchOptions) -> Result<Recommendation> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.answer.clone())
    }
}

/// Replies with fixed text, or fails when it has none, and records requests
#[derive(Default)]
pub struct RecordingCommentary {
    reply: Option<String>,
    requests: Mutex<Vec<CommentaryRequest>>,
}

impl RecordingCommentary {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<CommentaryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentaryProvider for RecordingCommentary {
    async fn commentary(&self, request: &CommentaryRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply
            .clone()
            .ok_or_else(|| ChessError::Http("commentary service offline".into()))
    }
}

pub fn services(recommender: Arc<dyn MoveRecommender>) -> Services {
    Services::new(ServerConfig::default(), recommender, Arc::new(FixedStats))
}

pub fn factory(recommender: Arc<ScriptedRecommender>) -> ServerFactory {
    ServerFactory::from_services(services(recommender))
}
