//! # chess-mcp-engine
//!
//! HTTP-backed collaborators for the chess MCP server:
//! - `ChessApiClient`, a `MoveRecommender` over a chess-api.com style service
//! - `ChessComClient`, a `StatsProvider` over the chess.com published-data API
//! - `ChatCommentaryClient`, a `CommentaryProvider` over a chat completions endpoint

pub mod chess_api;
pub mod chess_com;
pub mod commentary;

pub use chess_api::{ChessApiClient, ChessApiConfig};
pub use chess_com::{ChessComClient, ChessComConfig};
pub use commentary::{ChatCommentaryClient, CommentaryConfig};
