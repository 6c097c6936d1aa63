//! Static puzzle catalog

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A tactical puzzle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuzzleEntry {
    pub id: String,
    /// Target rating
    pub rating: u32,
    /// Starting position
    pub fen: String,
    /// Solution line in SAN, first move by the side to move
    pub solution: Vec<String>,
    pub themes: Vec<String>,
}

impl PuzzleEntry {
    fn new(id: &str, rating: u32, fen: &str, solution: &[&str], themes: &[&str]) -> Self {
        Self {
            id: id.into(),
            rating,
            fen: fen.into(),
            solution: solution.iter().map(|s| s.to_string()).collect(),
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Read-only collection of puzzles
#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    entries: Vec<PuzzleEntry>,
}

impl PuzzleCatalog {
    pub fn new(entries: Vec<PuzzleEntry>) -> Self {
        Self { entries }
    }

    /// Built-in catalog, constructed once
    pub fn builtin() -> &'static PuzzleCatalog {
        static CATALOG: LazyLock<PuzzleCatalog> = LazyLock::new(|| {
            PuzzleCatalog::new(vec![
                PuzzleEntry::new(
                    "back-rank-1",
                    600,
                    "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1",
                    &["Rd8#"],
                    &["mateIn1", "backRankMate"],
                ),
                PuzzleEntry::new(
                    "scholars-mate-1",
                    800,
                    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
                    &["Qxf7#"],
                    &["mateIn1", "opening"],
                ),
                PuzzleEntry::new(
                    "smothered-1",
                    1200,
                    "6rk/6pp/8/6N1/8/8/8/6K1 w - - 0 1",
                    &["Nf7#"],
                    &["mateIn1", "smotheredMate"],
                ),
                PuzzleEntry::new(
                    "royal-fork-1",
                    1500,
                    "r3k3/8/8/3N4/8/8/8/4K3 w - - 0 1",
                    &["Nc7+", "Kd7", "Nxa8"],
                    &["fork", "advantage"],
                ),
                PuzzleEntry::new(
                    "ladder-mate-1",
                    1843,
                    "6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1",
                    &["Rb7", "Kf8", "Ra8#"],
                    &["mateIn2", "endgame"],
                ),
                PuzzleEntry::new(
                    "queen-sacrifice-1",
                    2500,
                    "r1b2k1r/ppp1bppp/8/1B1Q4/5q2/2P5/PPP2PPP/R3R1K1 w - - 1 1",
                    &["Qd8+", "Bxd8", "Re8#"],
                    &["mateIn2", "sacrifice", "deflection"],
                ),
            ])
        });
        &CATALOG
    }

    pub fn entries(&self) -> &[PuzzleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PuzzleEntry> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// Entry whose rating is closest to `rating`; the earlier entry wins ties
    pub fn nearest(&self, rating: f64) -> Option<&PuzzleEntry> {
        let distance = |entry: &PuzzleEntry| (f64::from(entry.rating) - rating).abs();
        let mut best: Option<(&PuzzleEntry, f64)> = None;
        for entry in &self.entries {
            let d = distance(entry);
            if best.is_none_or(|(_, current)| d < current) {
                best = Some((entry, d));
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// Uniformly random entry
    pub fn random(&self) -> Option<&PuzzleEntry> {
        self.entries.choose(&mut rand::thread_rng())
    }
}
