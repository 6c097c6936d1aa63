//! # chess-mcp-core
//!
//! Core types for the chess-mcp server.
//!
//! This crate provides:
//! - `ChessGame`, the rules-engine adapter over shakmaty
//! - Plain-text board rendering
//! - Move-quality classification
//! - Static puzzle and opening catalogs
//! - Error types and JSON-RPC error codes

pub mod board;
pub mod error;
pub mod game;
pub mod opening;
pub mod puzzle;
pub mod quality;

pub use error::{ChessError, Result, error_codes};
pub use game::{ChessGame, GameStatus, LastMoveSnapshot, PlayedMove, START_FEN, Side};
pub use opening::{OpeningCatalog, OpeningEntry};
pub use puzzle::{PuzzleCatalog, PuzzleEntry};
pub use quality::{MoveAnalysis, MoveQuality, centipawn_delta, classify};
