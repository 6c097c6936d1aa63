//! Resource and tool catalog

use serde::Serialize;

/// Tool names as exposed to callers
pub mod names {
    pub const MOVE: &str = "move";
    pub const RESET: &str = "reset";
    pub const AI_MOVE: &str = "aiMove";
    pub const GET_PUZZLE: &str = "getPuzzle";
    pub const LIST_OPENINGS: &str = "listOpenings";
    pub const GET_PLAYER_STATS: &str = "getPlayerStats";
    pub const ANALYZE_LAST_MOVE: &str = "analyzeLastMove";
}

pub const BOARD_URI: &str = "chess://board";
pub const WIDGET_URI: &str = "ui://widget/chess-board.html";
pub const WIDGET_MIME: &str = "text/html+skybridge";

/// Tool definition for MCP tools/list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
    #[serde(rename = "_meta")]
    pub meta: serde_json::Value,
}

impl ToolDef {
    fn new(
        name: &str,
        title: &str,
        description: &str,
        input_schema: serde_json::Value,
        invoking: &str,
        invoked: &str,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            input_schema,
            meta: serde_json::json!({
                "openai/outputTemplate": WIDGET_URI,
                "openai/toolInvocation/invoking": invoking,
                "openai/toolInvocation/invoked": invoked,
                "openai/widgetAccessible": true
            }),
        }
    }
}

/// Resource definition for MCP resources/list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDef {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

fn empty_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

/// All tools, in a fixed order
pub fn list_tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            names::MOVE,
            "Make a move",
            "Play a move in the current game. Accepts algebraic (\"Nf3\", \"O-O\", \"exd8=Q\") or coordinate (\"g1f3\", \"e7e8q\") notation.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "move": {
                        "type": "string",
                        "description": "The move to play, e.g. \"e4\" or \"e2e4\""
                    }
                },
                "required": ["move"],
                "additionalProperties": false
            }),
            "Moving piece…",
            "Move played",
        ),
        ToolDef::new(
            names::RESET,
            "Reset the board",
            "Start a new game from the initial position, or from a named opening (see listOpenings).",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "opening": {
                        "type": "string",
                        "description": "Exact opening name, e.g. \"Ruy Lopez\""
                    }
                },
                "additionalProperties": false
            }),
            "Setting up the board…",
            "Board ready",
        ),
        ToolDef::new(
            names::AI_MOVE,
            "Engine move",
            "Ask the engine for the best move in the current position and play it.",
            empty_schema(),
            "Engine thinking…",
            "Engine moved",
        ),
        ToolDef::new(
            names::GET_PUZZLE,
            "Load a puzzle",
            "Load a tactical puzzle. With a rating, picks the puzzle closest to it; otherwise picks one at random.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "rating": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Target puzzle rating, e.g. 1200"
                    }
                },
                "additionalProperties": false
            }),
            "Finding a puzzle…",
            "Puzzle loaded",
        ),
        ToolDef::new(
            names::LIST_OPENINGS,
            "List openings",
            "List the openings that reset can load.",
            empty_schema(),
            "Listing openings…",
            "Openings listed",
        ),
        ToolDef::new(
            names::GET_PLAYER_STATS,
            "Player statistics",
            "Fetch ratings and win/loss records for a chess.com player.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "username": {
                        "type": "string",
                        "description": "chess.com username"
                    }
                },
                "required": ["username"],
                "additionalProperties": false
            }),
            "Fetching player stats…",
            "Player stats ready",
        ),
        ToolDef::new(
            names::ANALYZE_LAST_MOVE,
            "Analyze last move",
            "Evaluate the most recent move against the engine's recommendation and classify it as best, good, inaccuracy, mistake or blunder.",
            empty_schema(),
            "Analyzing move…",
            "Analysis ready",
        ),
    ]
}

/// All resources, in a fixed order
pub fn list_resources() -> Vec<ResourceDef> {
    vec![
        ResourceDef {
            uri: BOARD_URI.into(),
            name: "Chess board".into(),
            description: "Text rendering of the current position with side to move".into(),
            mime_type: "text/plain".into(),
        },
        ResourceDef {
            uri: WIDGET_URI.into(),
            name: "Chess board widget".into(),
            description: "Interactive board widget rendered by UI-capable clients".into(),
            mime_type: WIDGET_MIME.into(),
        },
    ]
}

/// Fixed widget document served at [`WIDGET_URI`]
pub const WIDGET_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<style>
  #board { display: grid; grid-template-columns: repeat(8, 40px); font-size: 30px; }
  #board div { width: 40px; height: 40px; display: flex; align-items: center; justify-content: center; }
  .light { background: #f0d9b5; } .dark { background: #b58863; }
  #status { font-family: sans-serif; margin-top: 8px; }
</style>
</head>
<body>
<div id="board"></div>
<div id="status"></div>
<script>
  const glyphs = { K: "♔", Q: "♕", R: "♖", B: "♗", N: "♘", P: "♙", k: "♚", q: "♛", r: "♜", b: "♝", n: "♞", p: "♟" };
  function render(state) {
    if (!state || !state.fen) return;
    const board = document.getElementById("board");
    board.innerHTML = "";
    state.fen.split(" ")[0].split("/").forEach((rank, r) => {
      let f = 0;
      for (const c of rank) {
        const n = parseInt(c, 10);
        const count = isNaN(n) ? 1 : n;
        for (let i = 0; i < count; i++, f++) {
          const cell = document.createElement("div");
          cell.className = (r + f) % 2 === 0 ? "light" : "dark";
          cell.textContent = isNaN(n) ? glyphs[c] : "";
          board.appendChild(cell);
        }
      }
    });
    document.getElementById("status").textContent = state.lastAction || "";
  }
  render(window.openai && window.openai.toolOutput);
  window.addEventListener("openai:set_globals", () => render(window.openai.toolOutput));
</script>
</body>
</html>
"#;
