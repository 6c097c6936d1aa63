//! Move commentary from an OpenAI-compatible chat completions endpoint

use async_trait::async_trait;
use chess_mcp_core::{ChessError, Result};
use chess_mcp_server::{CommentaryProvider, CommentaryRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "Generate professional chess commentary in the specified language. \
For Type=standard use 30-40 words. Return only the commentary.";

/// Configuration for the commentary client
#[derive(Debug, Clone)]
pub struct CommentaryConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            model: "local-model".to_string(),
            timeout: Duration::from_secs(30),
            max_tokens: 256,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Commentator prompt in the key/value layout the commentary models are tuned on
fn user_prompt(request: &CommentaryRequest) -> String {
    format!(
        "Language: English\nLangCode: en\nType: standard\nFEN: {}\nMoveSAN: {}\nSide: {}\nActor: bot\nTag: {}\nBestAlt: {}\nCP: {}",
        request.fen,
        request.move_san,
        request.side,
        request.tag,
        request.best_alt.as_deref().unwrap_or("none"),
        request.cp
    )
}

fn first_choice(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ChessError::Serialization("no choices in commentary response".into()))
}

/// HTTP client for a chat completions service
pub struct ChatCommentaryClient {
    http: reqwest::Client,
    config: CommentaryConfig,
}

impl ChatCommentaryClient {
    pub fn with_config(config: CommentaryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChessError::Http(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CommentaryProvider for ChatCommentaryClient {
    async fn commentary(&self, request: &CommentaryRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(request),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        debug!(san = %request.move_san, tag = %request.tag, "Requesting commentary");

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChessError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Commentary service returned an error status");
            return Err(ChessError::Http(format!("commentary service returned {}", status)));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChessError::Serialization(e.to_string()))?;
        first_choice(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn request() -> CommentaryRequest {
        CommentaryRequest {
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".into(),
            move_san: "Nf3".into(),
            side: "White".into(),
            tag: "Inaccuracy".into(),
            best_alt: Some("e4".into()),
            cp: "27->87 (Δ=60)".into(),
        }
    }

    #[test]
    fn test_prompt_fields() {
        let prompt = user_prompt(&request());
        assert!(prompt.contains("MoveSAN: Nf3\n"));
        assert!(prompt.contains("Side: White\n"));
        assert!(prompt.contains("Tag: Inaccuracy\n"));
        assert!(prompt.contains("BestAlt: e4\n"));
        assert!(prompt.ends_with("CP: 27->87 (Δ=60)"));

        let mut no_alt = request();
        no_alt.best_alt = None;
        assert!(user_prompt(&no_alt).contains("BestAlt: none\n"));
    }

    #[test]
    fn test_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Solid."}}]}"#,
        )
        .unwrap();
        assert_eq!(assert_ok!(first_choice(response)), "Solid.");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_err!(first_choice(empty));
    }

    #[test]
    fn test_endpoint() {
        let client = assert_ok!(ChatCommentaryClient::with_config(CommentaryConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..CommentaryConfig::default()
        }));
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
