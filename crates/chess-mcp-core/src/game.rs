//! Game state backed by the shakmaty rules engine
//!
//! `ChessGame` is the only place positions change. It accepts moves in
//! standard algebraic (`Nf3`, `O-O`, `exd8=Q+`) or coordinate (`g1f3`,
//! `e7e8q`) notation and keeps the position before every move so the last
//! move can be taken back or analysed.

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use crate::error::{ChessError, Result};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Side to move
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Where the game stands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate { winner: Side },
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate { .. } | GameStatus::Stalemate | GameStatus::InsufficientMaterial
        )
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "in progress"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "draw by stalemate"),
            GameStatus::InsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// A move that was applied, in both notations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayedMove {
    /// Standard algebraic notation including check suffix
    pub san: String,
    /// Coordinate notation
    pub uci: String,
}

impl PlayedMove {
    /// Whether `notation` names this move in either notation
    pub fn matches(&self, notation: &str) -> bool {
        let wanted = strip_annotations(notation.trim());
        if wanted.is_empty() {
            return false;
        }
        strip_annotations(&self.san) == wanted || self.uci.eq_ignore_ascii_case(wanted)
    }
}

fn strip_annotations(notation: &str) -> &str {
    notation.trim_end_matches(['+', '#', '!', '?'])
}

/// Positions either side of the most recent move, copied out of the game
#[derive(Debug, Clone)]
pub struct LastMoveSnapshot {
    pub before_fen: String,
    pub after_fen: String,
    pub played: PlayedMove,
    /// Side that played the move
    pub mover: Side,
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    played: PlayedMove,
    before: Chess,
}

/// One game: current position plus the history that led to it
#[derive(Debug, Clone)]
pub struct ChessGame {
    start: Chess,
    position: Chess,
    history: Vec<HistoryEntry>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    /// Game at the standard starting position
    pub fn new() -> Self {
        Self {
            start: Chess::default(),
            position: Chess::default(),
            history: Vec::new(),
        }
    }

    /// Game starting from an arbitrary position
    pub fn from_fen(fen: &str) -> Result<Self> {
        let position = parse_fen(fen)?;
        Ok(Self {
            start: position.clone(),
            position,
            history: Vec::new(),
        })
    }

    /// Current position as FEN
    pub fn fen(&self) -> String {
        to_fen(&self.position)
    }

    /// Position the game was set up from, before any history
    pub fn starting_fen(&self) -> String {
        to_fen(&self.start)
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn turn(&self) -> Side {
        self.position.turn().into()
    }

    pub fn status(&self) -> GameStatus {
        let pos = &self.position;
        if pos.is_checkmate() {
            GameStatus::Checkmate {
                winner: pos.turn().other().into(),
            }
        } else if pos.is_stalemate() {
            GameStatus::Stalemate
        } else if pos.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if pos.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Applied moves, oldest first
    pub fn history(&self) -> Vec<PlayedMove> {
        self.history.iter().map(|e| e.played.clone()).collect()
    }

    pub fn last_move(&self) -> Option<&PlayedMove> {
        self.history.last().map(|e| &e.played)
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Apply a move given in SAN or coordinate notation.
    ///
    /// The position is untouched when the move is rejected.
    pub fn apply(&mut self, notation: &str) -> Result<PlayedMove> {
        let status = self.status();
        if status.is_terminal() {
            return Err(ChessError::GameOver(status.to_string()));
        }

        let mv = parse_move(&self.position, notation)?;
        let played = PlayedMove {
            san: SanPlus::from_move(self.position.clone(), &mv).to_string(),
            uci: mv.to_uci(CastlingMode::Standard).to_string(),
        };

        let before = self.position.clone();
        self.position = before
            .clone()
            .play(&mv)
            .map_err(|e| ChessError::IllegalMove {
                mv: notation.to_string(),
                reason: e.to_string(),
            })?;
        self.history.push(HistoryEntry {
            played: played.clone(),
            before,
        });
        Ok(played)
    }

    /// Take back the most recent move
    pub fn rollback_one(&mut self) -> Option<PlayedMove> {
        let entry = self.history.pop()?;
        self.position = entry.before;
        Some(entry.played)
    }

    /// Replace the position, clearing history
    pub fn load_fen(&mut self, fen: &str) -> Result<()> {
        let position = parse_fen(fen)?;
        self.start = position.clone();
        self.position = position;
        self.history.clear();
        Ok(())
    }

    /// Back to the starting position
    pub fn reset(&mut self) {
        self.start = Chess::default();
        self.position = Chess::default();
        self.history.clear();
    }

    /// Copy out the positions around the last move without touching the game
    pub fn last_move_snapshot(&self) -> Option<LastMoveSnapshot> {
        let entry = self.history.last()?;
        Some(LastMoveSnapshot {
            before_fen: to_fen(&entry.before),
            after_fen: self.fen(),
            played: entry.played.clone(),
            mover: entry.before.turn().into(),
        })
    }

    /// Numbered move list, e.g. `1. e4 e5 2. Nf3`
    pub fn move_list(&self) -> String {
        let mut out = String::new();
        for entry in &self.history {
            let number = entry.before.fullmoves().get();
            let white = entry.before.turn() == Color::White;
            if !out.is_empty() {
                out.push(' ');
            }
            if white {
                out.push_str(&format!("{}. ", number));
            } else if out.is_empty() {
                out.push_str(&format!("{}... ", number));
            }
            out.push_str(&entry.played.san);
        }
        out
    }
}

fn parse_fen(fen: &str) -> Result<Chess> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| ChessError::InvalidPosition(format!("{}: {}", fen, e)))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| ChessError::InvalidPosition(format!("{}: {}", fen, e)))
}

fn to_fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

fn parse_move(position: &Chess, notation: &str) -> Result<Move> {
    let text = notation.trim();
    let illegal = |reason: &str| ChessError::IllegalMove {
        mv: notation.to_string(),
        reason: reason.to_string(),
    };
    if text.is_empty() {
        return Err(illegal("empty move"));
    }

    if let Ok(uci) = UciMove::from_ascii(text.to_ascii_lowercase().as_bytes()) {
        return uci
            .to_move(position)
            .map_err(|_| illegal("not a legal move in this position"));
    }

    let san: SanPlus = text
        .replace('0', "O")
        .parse()
        .map_err(|_| illegal("not valid algebraic or coordinate notation"))?;
    san.san
        .to_move(position)
        .map_err(|e| illegal(&e.to_string()))
}
