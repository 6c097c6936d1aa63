//! Move-quality classification

use serde::{Deserialize, Serialize};

use crate::game::{PlayedMove, Side};

/// Centipawn thresholds, exclusive lower bounds
pub const INACCURACY_THRESHOLD: i32 = 50;
pub const MISTAKE_THRESHOLD: i32 = 150;
pub const BLUNDER_THRESHOLD: i32 = 300;

/// Human-facing verdict for a played move
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MoveQuality {
    Best,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl std::fmt::Display for MoveQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MoveQuality::Best => "Best",
            MoveQuality::Good => "Good",
            MoveQuality::Inaccuracy => "Inaccuracy",
            MoveQuality::Mistake => "Mistake",
            MoveQuality::Blunder => "Blunder",
        };
        f.write_str(label)
    }
}

/// Evaluation change in centipawns between two evaluations given in pawns.
///
/// Both evaluations are rounded to whole centipawns before subtracting. No
/// adjustment is made for which side moved.
pub fn centipawn_delta(eval_before: f64, eval_after: f64) -> i32 {
    to_centipawns(eval_after) - to_centipawns(eval_before)
}

fn to_centipawns(pawns: f64) -> i32 {
    (pawns * 100.0).round() as i32
}

/// Classify a played move against the recommended alternative.
///
/// A move that matches the recommendation in either notation is `Best`;
/// otherwise the magnitude of `delta` decides, sign ignored.
pub fn classify(played: &PlayedMove, best_alt: Option<&str>, delta: i32) -> MoveQuality {
    if best_alt.is_some_and(|best| played.matches(best)) {
        return MoveQuality::Best;
    }

    let d = delta.saturating_abs();
    let mut tag = MoveQuality::Good;
    if d > INACCURACY_THRESHOLD {
        tag = MoveQuality::Inaccuracy;
    }
    if d > MISTAKE_THRESHOLD {
        tag = MoveQuality::Mistake;
    }
    if d > BLUNDER_THRESHOLD {
        tag = MoveQuality::Blunder;
    }
    tag
}

/// Result of analysing the most recent move. Computed per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveAnalysis {
    pub played_move: PlayedMove,
    /// Side that played the move
    pub side: Side,
    pub eval_before: f64,
    pub eval_after: f64,
    pub delta_centipawns: i32,
    /// Centipawn change as `before->after (Δ=delta)`, e.g. `27->21 (Δ=-6)`
    pub eval_change: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_alternative: Option<String>,
    pub quality: MoveQuality,
}

impl MoveAnalysis {
    pub fn new(
        played_move: PlayedMove,
        side: Side,
        eval_before: f64,
        eval_after: f64,
        best_alternative: Option<String>,
    ) -> Self {
        let delta_centipawns = centipawn_delta(eval_before, eval_after);
        let quality = classify(&played_move, best_alternative.as_deref(), delta_centipawns);
        let eval_change = format!(
            "{}->{} (Δ={})",
            to_centipawns(eval_before),
            to_centipawns(eval_after),
            delta_centipawns
        );
        Self {
            played_move,
            side,
            eval_before,
            eval_after,
            delta_centipawns,
            eval_change,
            best_alternative,
            quality,
        }
    }

    /// One-line summary, e.g. `Nf3 was an Inaccuracy (27 -> 87, delta 60). Best was e4.`
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} was {} ({} -> {}, delta {})",
            self.played_move.san,
            article(self.quality),
            to_centipawns(self.eval_before),
            to_centipawns(self.eval_after),
            self.delta_centipawns
        );
        match (&self.best_alternative, self.quality) {
            (_, MoveQuality::Best) => text.push('.'),
            (Some(best), _) => text.push_str(&format!(". Best was {}.", best)),
            (None, _) => text.push('.'),
        }
        text
    }
}

fn article(quality: MoveQuality) -> String {
    match quality {
        MoveQuality::Best => "the best move".to_string(),
        MoveQuality::Good => "a good move".to_string(),
        MoveQuality::Inaccuracy => "an Inaccuracy".to_string(),
        other => format!("a {}", other),
    }
}
