//! Static opening catalog

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{ChessError, Result};

/// A named opening and the position it reaches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpeningEntry {
    pub name: String,
    pub eco: String,
    /// Main line in SAN, space separated
    pub moves: String,
    pub fen: String,
}

impl OpeningEntry {
    fn new(name: &str, eco: &str, moves: &str, fen: &str) -> Self {
        Self {
            name: name.into(),
            eco: eco.into(),
            moves: moves.into(),
            fen: fen.into(),
        }
    }
}

/// Read-only collection of openings, looked up by exact name
#[derive(Debug, Clone)]
pub struct OpeningCatalog {
    entries: Vec<OpeningEntry>,
}

impl OpeningCatalog {
    pub fn new(entries: Vec<OpeningEntry>) -> Self {
        Self { entries }
    }

    /// Built-in catalog, constructed once
    pub fn builtin() -> &'static OpeningCatalog {
        static CATALOG: LazyLock<OpeningCatalog> = LazyLock::new(|| {
            OpeningCatalog::new(vec![
                OpeningEntry::new(
                    "Ruy Lopez",
                    "C60",
                    "e4 e5 Nf3 Nc6 Bb5",
                    "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
                ),
                OpeningEntry::new(
                    "Italian Game",
                    "C50",
                    "e4 e5 Nf3 Nc6 Bc4",
                    "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
                ),
                OpeningEntry::new(
                    "Sicilian Defense",
                    "B20",
                    "e4 c5",
                    "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                ),
                OpeningEntry::new(
                    "French Defense",
                    "C00",
                    "e4 e6",
                    "rnbqkbnr/pppp1ppp/4p3/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                ),
                OpeningEntry::new(
                    "Caro-Kann Defense",
                    "B10",
                    "e4 c6",
                    "rnbqkbnr/pp1ppppp/2p5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                ),
                OpeningEntry::new(
                    "Queen's Gambit",
                    "D06",
                    "d4 d5 c4",
                    "rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR b KQkq - 0 2",
                ),
                OpeningEntry::new(
                    "King's Indian Defense",
                    "E60",
                    "d4 Nf6 c4 g6",
                    "rnbqkb1r/pppppp1p/5np1/8/2PP4/8/PP2PPPP/RNBQKBNR w KQkq - 0 3",
                ),
                OpeningEntry::new(
                    "English Opening",
                    "A10",
                    "c4",
                    "rnbqkbnr/pppppppp/8/8/2P5/8/PP1PPPPP/RNBQKBNR b KQkq - 0 1",
                ),
            ])
        });
        &CATALOG
    }

    pub fn entries(&self) -> &[OpeningEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|o| o.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&OpeningEntry> {
        self.entries.iter().find(|o| o.name == name)
    }

    /// Like [`get`](Self::get), failing with the list of valid names
    pub fn lookup(&self, name: &str) -> Result<&OpeningEntry> {
        self.get(name).ok_or_else(|| ChessError::UnknownOpening {
            name: name.to_string(),
            available: self.names(),
        })
    }
}
