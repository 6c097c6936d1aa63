//! Plain-text board rendering

use shakmaty::{Board, File, Position, Rank, Square};

use crate::game::{ChessGame, GameStatus};

const FILES: &str = "    a  b  c  d  e  f  g  h";
const BORDER: &str = "  +------------------------+";

/// Render a board as an 8x8 grid, White at the bottom. Empty squares are `.`.
pub fn render_board(board: &Board) -> String {
    let mut lines = vec![BORDER.to_string()];

    for rank in Rank::ALL.iter().rev() {
        let row: Vec<String> = File::ALL
            .iter()
            .map(|&file| {
                board
                    .piece_at(Square::from_coords(file, *rank))
                    .map_or('.', |piece| piece.char())
                    .to_string()
            })
            .collect();
        lines.push(format!("{} | {} |", rank.char(), row.join("  ")));
    }

    lines.push(BORDER.to_string());
    lines.push(FILES.to_string());
    lines.join("\n")
}

/// Board, side to move and status, as served by the board resource
pub fn render_game(game: &ChessGame) -> String {
    let fen = game.fen();
    let mut out = render_board(game.position().board());
    out.push('\n');

    match game.status() {
        status @ (GameStatus::Ongoing | GameStatus::Check) => {
            out.push_str(&format!("{} to move", game.turn()));
            if status == GameStatus::Check {
                out.push_str(" (in check)");
            }
        }
        status => out.push_str(&format!("Game over: {}", status)),
    }

    if let Some(last) = game.last_move() {
        out.push_str(&format!("\nLast move: {}", last.san));
    }
    out.push_str(&format!("\nFEN: {}", fen));
    out
}
