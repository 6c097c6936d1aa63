//! MCP tool handlers

use chess_mcp_core::{
    ChessError, ChessGame, GameStatus, MoveAnalysis, OpeningEntry, Result, Side, board,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::ChessServer;
use crate::capabilities::names;
use crate::engine::CommentaryRequest;

/// Game state attached to every tool result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub fen: String,
    /// Position the move list starts from
    pub start_fen: String,
    /// Text rendering, as served by the board resource
    pub board: String,
    pub turn: Side,
    pub status: GameStatus,
    /// Moves played since the position was set up, in SAN
    pub moves: Vec<String>,
    pub last_action: String,
}

impl GameSnapshot {
    pub fn capture(game: &ChessGame, last_action: impl Into<String>) -> Self {
        Self {
            fen: game.fen(),
            start_fen: game.starting_fen(),
            board: board::render_game(game),
            turn: game.turn(),
            status: game.status(),
            moves: game.history().into_iter().map(|m| m.san).collect(),
            last_action: last_action.into(),
        }
    }
}

/// Text content item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result envelope for tools/call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    pub structured_content: Value,
    pub is_error: bool,
    /// Data for the widget only, kept out of the structured content
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ToolResult {
    /// Error-tagged result; the game snapshot shows the unchanged state
    pub fn error(err: &ChessError, snapshot: GameSnapshot) -> Self {
        let mut error = serde_json::json!({
            "kind": err.kind(),
            "code": err.code(),
            "message": err.to_string(),
        });
        if let ChessError::UnknownOpening { available, .. } = err {
            error["availableOpenings"] = serde_json::json!(available);
        }

        let mut structured = snapshot_object(&snapshot);
        structured.insert("error".to_string(), error);
        Self {
            content: vec![TextContent::new(err.to_string())],
            structured_content: Value::Object(structured),
            is_error: true,
            meta: None,
        }
    }

    /// Text of the first content item
    pub fn summary(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

fn snapshot_object(snapshot: &GameSnapshot) -> Map<String, Value> {
    match serde_json::to_value(snapshot) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// What a handler produced, before it is wrapped in the envelope
struct ToolOutput {
    summary: String,
    snapshot: GameSnapshot,
    extra: Map<String, Value>,
    meta: Option<Value>,
}

impl ToolOutput {
    fn new(summary: impl Into<String>, snapshot: GameSnapshot) -> Self {
        Self {
            summary: summary.into(),
            snapshot,
            extra: Map::new(),
            meta: None,
        }
    }

    fn with(mut self, key: &str, value: impl Serialize) -> Result<Self> {
        self.extra
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    fn into_result(self) -> ToolResult {
        let mut structured = snapshot_object(&self.snapshot);
        structured.extend(self.extra);
        ToolResult {
            content: vec![TextContent::new(self.summary)],
            structured_content: Value::Object(structured),
            is_error: false,
            meta: self.meta,
        }
    }
}

/// Parameters for move
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveParams {
    #[serde(rename = "move")]
    pub mv: String,
}

/// Parameters for reset
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetParams {
    pub opening: Option<String>,
}

/// Parameters for getPuzzle
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleParams {
    pub rating: Option<f64>,
}

/// Parameters for getPlayerStats
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerStatsParams {
    pub username: String,
}

/// Tools that take no input
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoParams {}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => args,
        other => {
            return Err(ChessError::InvalidArguments(format!(
                "arguments must be an object, got {}",
                other
            )));
        }
    };
    serde_json::from_value(args).map_err(|e| ChessError::InvalidArguments(e.to_string()))
}

/// Handle a tools/call request.
///
/// Unknown tools and malformed arguments are returned as `Err` so the caller
/// can reject the request; every other failure becomes an error-tagged result.
pub async fn call_tool(server: &ChessServer, name: &str, args: Value) -> Result<ToolResult> {
    debug!(session = server.session_id(), tool = name, "Tool call");

    let result = match name {
        names::MOVE => handle_move(server, parse_args(args)?).await,
        names::RESET => handle_reset(server, parse_args(args)?).await,
        names::AI_MOVE => {
            let NoParams {} = parse_args(args)?;
            handle_ai_move(server).await
        }
        names::GET_PUZZLE => handle_get_puzzle(server, parse_args(args)?).await,
        names::LIST_OPENINGS => {
            let NoParams {} = parse_args(args)?;
            handle_list_openings(server).await
        }
        names::GET_PLAYER_STATS => handle_player_stats(server, parse_args(args)?).await,
        names::ANALYZE_LAST_MOVE => {
            let NoParams {} = parse_args(args)?;
            handle_analyze_last_move(server).await
        }
        _ => return Err(ChessError::MethodNotFound(format!("Unknown tool: {}", name))),
    };

    match result {
        Ok(output) => Ok(output.into_result()),
        Err(e) if e.is_protocol_error() => Err(e),
        Err(e) => {
            warn!(session = server.session_id(), tool = name, "Tool failed: {}", e);
            let game = server.game().lock().await;
            Ok(ToolResult::error(
                &e,
                GameSnapshot::capture(&game, format!("{} failed", name)),
            ))
        }
    }
}

async fn handle_move(server: &ChessServer, params: MoveParams) -> Result<ToolOutput> {
    let mut game = server.game().lock().await;
    let played = game.apply(&params.mv)?;
    info!(session = server.session_id(), san = %played.san, "Move played");

    let mut summary = format!("Played {}.", played.san);
    let status = game.status();
    if status != GameStatus::Ongoing {
        summary.push_str(&format!(" Status: {}.", status));
    }

    ToolOutput::new(
        summary,
        GameSnapshot::capture(&game, format!("move {}", played.san)),
    )
    .with("move", &played)
}

async fn handle_reset(server: &ChessServer, params: ResetParams) -> Result<ToolOutput> {
    let opening: Option<OpeningEntry> = match params.opening.as_deref() {
        Some(name) => Some(server.services().openings.lookup(name)?.clone()),
        None => None,
    };

    let mut game = server.game().lock().await;
    match opening {
        Some(opening) => {
            game.load_fen(&opening.fen)?;
            info!(session = server.session_id(), opening = %opening.name, "Loaded opening");
            let summary = format!(
                "Loaded the {} ({}: {}). {} to move.",
                opening.name,
                opening.eco,
                opening.moves,
                game.turn()
            );
            let action = format!("reset to {}", opening.name);
            ToolOutput::new(summary, GameSnapshot::capture(&game, action)).with("opening", &opening)
        }
        None => {
            game.reset();
            info!(session = server.session_id(), "Reset to starting position");
            Ok(ToolOutput::new(
                "New game started. White to move.",
                GameSnapshot::capture(&game, "reset"),
            ))
        }
    }
}

fn unavailable(err: ChessError) -> ChessError {
    match err {
        ChessError::RecommendationUnavailable(_) => err,
        other => ChessError::RecommendationUnavailable(other.to_string()),
    }
}

async fn handle_ai_move(server: &ChessServer) -> Result<ToolOutput> {
    // Held across the recommendation call so nothing else moves in between.
    let mut game = server.game().lock().await;
    let status = game.status();
    if status.is_terminal() {
        return Err(ChessError::GameOver(status.to_string()));
    }

    let fen = game.fen();
    let search = server.services().config.search;
    let recommendation = server
        .services()
        .recommender
        .recommend(&fen, search)
        .await
        .map_err(unavailable)?;

    let mv = recommendation
        .best_move()
        .ok_or_else(|| ChessError::RecommendationUnavailable("engine returned no move".into()))?
        .to_string();
    let played = game.apply(&mv).map_err(|e| {
        ChessError::RecommendationUnavailable(format!("engine suggested '{}': {}", mv, e))
    })?;
    info!(session = server.session_id(), san = %played.san, eval = recommendation.evaluation, "Engine moved");

    let mut summary = format!(
        "Engine played {} (evaluation {:+.2}).",
        played.san, recommendation.evaluation
    );
    let status = game.status();
    if status != GameStatus::Ongoing {
        summary.push_str(&format!(" Status: {}.", status));
    }

    ToolOutput::new(
        summary,
        GameSnapshot::capture(&game, format!("aiMove {}", played.san)),
    )
    .with("move", &played)?
    .with("evaluation", recommendation.evaluation)?
    .with("mate", recommendation.mate)
}

async fn handle_get_puzzle(server: &ChessServer, params: PuzzleParams) -> Result<ToolOutput> {
    let catalog = &server.services().puzzles;
    let puzzle = match params.rating {
        Some(rating) if !rating.is_finite() || rating < 0.0 => {
            return Err(ChessError::InvalidArguments(format!(
                "rating must be a non-negative number, got {}",
                rating
            )));
        }
        Some(rating) => catalog.nearest(rating),
        None => catalog.random(),
    }
    .ok_or_else(|| ChessError::InvalidPosition("puzzle catalog is empty".into()))?;

    let mut game = server.game().lock().await;
    game.load_fen(&puzzle.fen)?;
    info!(session = server.session_id(), puzzle = %puzzle.id, rating = puzzle.rating, "Loaded puzzle");

    let summary = format!(
        "Puzzle {} (rating {}, themes: {}). {} to move and win.",
        puzzle.id,
        puzzle.rating,
        puzzle.themes.join(", "),
        game.turn()
    );
    let mut output = ToolOutput::new(
        summary,
        GameSnapshot::capture(&game, format!("puzzle {}", puzzle.id)),
    )
    .with(
        "puzzle",
        serde_json::json!({
            "id": puzzle.id,
            "rating": puzzle.rating,
            "themes": puzzle.themes,
            "toMove": game.turn(),
        }),
    )?;
    output.meta = Some(serde_json::json!({
        "chess/puzzleId": puzzle.id,
        "chess/puzzleSolution": puzzle.solution,
    }));
    Ok(output)
}

async fn handle_list_openings(server: &ChessServer) -> Result<ToolOutput> {
    let openings = &server.services().openings;
    let summary = format!("Available openings: {}.", openings.names().join(", "));
    let listing: Vec<Value> = openings
        .entries()
        .iter()
        .map(|o| serde_json::json!({ "name": o.name, "eco": o.eco, "moves": o.moves }))
        .collect();

    let game = server.game().lock().await;
    ToolOutput::new(summary, GameSnapshot::capture(&game, "listOpenings")).with("openings", listing)
}

async fn handle_player_stats(
    server: &ChessServer,
    params: PlayerStatsParams,
) -> Result<ToolOutput> {
    let username = params.username.trim();
    if username.is_empty() {
        return Err(ChessError::InvalidArguments("username must not be empty".into()));
    }

    let stats = server
        .services()
        .stats
        .player_stats(username)
        .await
        .map_err(|e| match e {
            ChessError::StatsUnavailable(_) => e,
            other => ChessError::StatsUnavailable(format!("{}: {}", username, other)),
        })?;

    let game = server.game().lock().await;
    ToolOutput::new(
        stats.summary(),
        GameSnapshot::capture(&game, format!("stats {}", username)),
    )
    .with("stats", &stats)
}

async fn handle_analyze_last_move(server: &ChessServer) -> Result<ToolOutput> {
    // Evaluate copies; the shared game is never rolled back.
    let snapshot = {
        let game = server.game().lock().await;
        game.last_move_snapshot()
    }
    .ok_or(ChessError::NoMoveHistory)?;

    let search = server.services().config.search;
    let recommender = &server.services().recommender;
    let after = recommender
        .recommend(&snapshot.after_fen, search)
        .await
        .map_err(unavailable)?;
    let before = recommender
        .recommend(&snapshot.before_fen, search)
        .await
        .map_err(unavailable)?;

    let analysis = MoveAnalysis::new(
        snapshot.played,
        snapshot.mover,
        before.evaluation,
        after.evaluation,
        before.display_move(),
    );
    info!(
        session = server.session_id(),
        san = %analysis.played_move.san,
        delta = analysis.delta_centipawns,
        quality = %analysis.quality,
        "Analyzed move"
    );

    let commentary = match &server.services().commentary {
        Some(provider) => {
            let request = CommentaryRequest::from_analysis(&snapshot.before_fen, &analysis);
            match provider.commentary(&request).await {
                Ok(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
                Err(e) => {
                    warn!(session = server.session_id(), "Commentary unavailable: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let mut summary = analysis.summary();
    if let Some(text) = &commentary {
        summary.push('\n');
        summary.push_str(text);
    }

    let game = server.game().lock().await;
    let output = ToolOutput::new(summary, GameSnapshot::capture(&game, "analyzeLastMove"))
        .with("analysis", &analysis)?;
    match commentary {
        Some(text) => output.with("commentary", text),
        None => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerFactory;
    use crate::testing::{
        GatedRecommender, RecordingCommentary, ScriptedRecommender, factory, services,
    };
    use chess_mcp_core::{OpeningCatalog, START_FEN};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn fen_after(moves: &[&str]) -> String {
        let mut game = ChessGame::new();
        for mv in moves {
            game.apply(mv).unwrap();
        }
        game.fen()
    }

    async fn current_fen(server: &ChessServer) -> String {
        server.game().lock().await.fen()
    }

    #[tokio::test]
    async fn test_illegal_move_keeps_position() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);

        let result = call_tool(&server, "move", json!({ "move": "e5" })).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "IllegalMove");
        assert_eq!(current_fen(&server).await, START_FEN);

        let result = call_tool(&server, "move", json!({ "move": "e4" })).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.summary(), "Played e4.");
        assert_eq!(result.structured_content["lastAction"], "move e4");
        assert_eq!(result.structured_content["turn"], "black");
        assert_eq!(result.structured_content["fen"], fen_after(&["e4"]));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);

        for args in [json!({}), json!({ "move": 5 }), json!({ "move": "e4", "x": 1 }), json!("e4")] {
            let err = call_tool(&server, "move", args).await.unwrap_err();
            assert!(matches!(err, ChessError::InvalidArguments(_)), "{:?}", err);
        }
        let err = call_tool(&server, "aiMove", json!({ "depth": 3 })).await.unwrap_err();
        assert!(matches!(err, ChessError::InvalidArguments(_)));
        assert_eq!(current_fen(&server).await, START_FEN);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        let err = call_tool(&server, "resign", Value::Null).await.unwrap_err();
        assert!(matches!(err, ChessError::MethodNotFound(_)));
    }

    #[tokio::test]
    async fn test_reset_to_opening() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        call_tool(&server, "move", json!({ "move": "d4" })).await.unwrap();

        let result = call_tool(&server, "reset", json!({ "opening": "Ruy Lopez" }))
            .await
            .unwrap();
        assert!(!result.is_error);
        let ruy = OpeningCatalog::builtin().get("Ruy Lopez").unwrap();
        assert_eq!(current_fen(&server).await, ruy.fen);
        assert_eq!(result.structured_content["opening"]["eco"], "C60");
        assert_eq!(result.structured_content["moves"], json!([]));
        assert_eq!(result.structured_content["startFen"], ruy.fen);

        let result = call_tool(&server, "reset", Value::Null).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(current_fen(&server).await, START_FEN);
    }

    #[tokio::test]
    async fn test_reset_unknown_opening() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        call_tool(&server, "move", json!({ "move": "e4" })).await.unwrap();
        let before = current_fen(&server).await;

        let result = call_tool(&server, "reset", json!({ "opening": "Nonexistent" }))
            .await
            .unwrap();
        assert!(result.is_error);
        let error = &result.structured_content["error"];
        assert_eq!(error["kind"], "UnknownOpening");
        assert_eq!(
            error["availableOpenings"],
            json!(OpeningCatalog::builtin().names())
        );
        assert!(result.summary().contains("Ruy Lopez"));
        assert_eq!(current_fen(&server).await, before);
    }

    #[tokio::test]
    async fn test_puzzle_by_rating_hides_solution() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);

        for rating in [1200, 1300] {
            let result = call_tool(&server, "getPuzzle", json!({ "rating": rating }))
                .await
                .unwrap();
            assert!(!result.is_error);
            assert_eq!(result.structured_content["puzzle"]["rating"], 1200);
            assert_eq!(
                current_fen(&server).await,
                "6rk/6pp/8/6N1/8/8/8/6K1 w - - 0 1"
            );

            let meta = result.meta.as_ref().unwrap();
            assert_eq!(meta["chess/puzzleSolution"], json!(["Nf7#"]));
            let structured = result.structured_content.to_string();
            assert!(!structured.contains("Nf7#"));
            assert!(!result.summary().contains("Nf7"));
        }
    }

    #[tokio::test]
    async fn test_puzzle_fractional_rating() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);

        for (rating, expected) in [(700.4, 800), (1000.4, 1200), (699.5, 600)] {
            let result = call_tool(&server, "getPuzzle", json!({ "rating": rating }))
                .await
                .unwrap();
            assert_eq!(
                result.structured_content["puzzle"]["rating"], expected,
                "rating {}",
                rating
            );
        }
    }

    #[tokio::test]
    async fn test_puzzle_random_and_bad_rating() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        let result = call_tool(&server, "getPuzzle", json!({})).await.unwrap();
        assert!(!result.is_error);
        assert!(result.structured_content["puzzle"]["id"].is_string());

        let err = call_tool(&server, "getPuzzle", json!({ "rating": -5 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ChessError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_list_openings() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        let result = call_tool(&server, "listOpenings", json!({})).await.unwrap();
        assert_eq!(result.structured_content["openings"].as_array().unwrap().len(), 8);
        assert!(result.summary().contains("Queen's Gambit"));
    }

    #[tokio::test]
    async fn test_ai_move_applies_recommendation() {
        let engine = Arc::new(ScriptedRecommender::default().with(
            START_FEN,
            Some("e2e4"),
            Some("e4"),
            0.3,
        ));
        let server = factory(engine.clone()).new_server(None);

        let result = call_tool(&server, "aiMove", Value::Null).await.unwrap();
        assert!(!result.is_error, "{}", result.summary());
        assert_eq!(result.structured_content["move"]["san"], "e4");
        assert_eq!(current_fen(&server).await, fen_after(&["e4"]));
        assert_eq!(engine.calls(), vec![START_FEN.to_string()]);
    }

    #[tokio::test]
    async fn test_ai_move_without_usable_move() {
        let engine = Arc::new(
            ScriptedRecommender::default()
                .with(START_FEN, None, None, 0.3)
                .with(&fen_after(&["e4"]), Some("e2e4"), None, 0.0),
        );
        let server = factory(engine).new_server(None);

        let result = call_tool(&server, "aiMove", json!({})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "RecommendationUnavailable");
        assert_eq!(current_fen(&server).await, START_FEN);

        call_tool(&server, "move", json!({ "move": "e4" })).await.unwrap();
        let result = call_tool(&server, "aiMove", json!({})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "RecommendationUnavailable");
        assert_eq!(current_fen(&server).await, fen_after(&["e4"]));
    }

    #[tokio::test]
    async fn test_ai_move_service_failure() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        let result = call_tool(&server, "aiMove", json!({})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "RecommendationUnavailable");
    }

    #[tokio::test]
    async fn test_ai_move_when_game_over() {
        let engine = Arc::new(ScriptedRecommender::default());
        let server = factory(engine.clone()).new_server(None);
        for mv in ["f3", "e5", "g4", "Qh4#"] {
            call_tool(&server, "move", json!({ "move": mv })).await.unwrap();
        }
        let result = call_tool(&server, "aiMove", json!({})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "GameOver");
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_without_history() {
        let engine = Arc::new(ScriptedRecommender::default());
        let server = factory(engine.clone()).new_server(None);

        let result = call_tool(&server, "analyzeLastMove", json!({})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "NoMoveHistory");
        assert!(engine.calls().is_empty());
        assert_eq!(current_fen(&server).await, START_FEN);
    }

    #[tokio::test]
    async fn test_analyze_classifies_inaccuracy() {
        let after = fen_after(&["Nf3"]);
        let engine = Arc::new(
            ScriptedRecommender::default()
                .with(START_FEN, Some("e2e4"), Some("e4"), 0.27)
                .with(&after, Some("d7d5"), Some("d5"), 0.87),
        );
        let server = factory(engine.clone()).new_server(None);
        call_tool(&server, "move", json!({ "move": "Nf3" })).await.unwrap();

        let result = call_tool(&server, "analyzeLastMove", json!({})).await.unwrap();
        assert!(!result.is_error, "{}", result.summary());
        let analysis = &result.structured_content["analysis"];
        assert_eq!(analysis["quality"], "inaccuracy");
        assert_eq!(analysis["deltaCentipawns"], 60);
        assert_eq!(analysis["bestAlternative"], "e4");
        assert_eq!(analysis["side"], "white");
        assert_eq!(analysis["evalChange"], "27->87 (Δ=60)");
        assert!(result.structured_content.get("commentary").is_none());

        assert_eq!(engine.calls(), vec![after.clone(), START_FEN.to_string()]);
        assert_eq!(current_fen(&server).await, after);
        assert_eq!(server.game().lock().await.move_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_best_move() {
        let after = fen_after(&["e4"]);
        let engine = Arc::new(
            ScriptedRecommender::default()
                .with(START_FEN, Some("e2e4"), Some("e4"), 0.3)
                .with(&after, Some("c7c5"), Some("c5"), -2.0),
        );
        let server = factory(engine).new_server(None);
        call_tool(&server, "move", json!({ "move": "e2e4" })).await.unwrap();

        let result = call_tool(&server, "analyzeLastMove", json!({})).await.unwrap();
        assert_eq!(result.structured_content["analysis"]["quality"], "best");
    }

    #[tokio::test]
    async fn test_analyze_service_failure_leaves_game() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);
        call_tool(&server, "move", json!({ "move": "e4" })).await.unwrap();

        let result = call_tool(&server, "analyzeLastMove", json!({})).await.unwrap();
        assert!(result.is_error);
        assert_eq!(current_fen(&server).await, fen_after(&["e4"]));
    }

    #[tokio::test]
    async fn test_player_stats() {
        let server = factory(Arc::new(ScriptedRecommender::default())).new_server(None);

        let result = call_tool(&server, "getPlayerStats", json!({ "username": "magnus" }))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.structured_content["stats"]["ratings"][0]["current"], 3200);

        let result = call_tool(&server, "getPlayerStats", json!({ "username": "nobody" }))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content["error"]["kind"], "StatsUnavailable");

        let err = call_tool(&server, "getPlayerStats", json!({ "username": " " }))
            .await
            .unwrap_err();
        assert!(matches!(err, ChessError::InvalidArguments(_)));
    }

    fn nf3_engine() -> ScriptedRecommender {
        ScriptedRecommender::default()
            .with(START_FEN, Some("e2e4"), Some("e4"), 0.27)
            .with(&fen_after(&["Nf3"]), Some("d7d5"), Some("d5"), 0.87)
    }

    #[tokio::test]
    async fn test_analyze_attaches_commentary() {
        let commentator = Arc::new(RecordingCommentary::replying(
            " A quiet developing move, but e4 claims the centre. ",
        ));
        let services = services(Arc::new(nf3_engine())).with_commentary(commentator.clone());
        let server = ServerFactory::from_services(services).new_server(None);
        call_tool(&server, "move", json!({ "move": "Nf3" })).await.unwrap();

        let result = call_tool(&server, "analyzeLastMove", json!({})).await.unwrap();
        assert!(!result.is_error, "{}", result.summary());
        assert_eq!(
            result.structured_content["commentary"],
            "A quiet developing move, but e4 claims the centre."
        );
        assert!(result.summary().ends_with("claims the centre."));

        assert_eq!(
            commentator.requests(),
            vec![CommentaryRequest {
                fen: START_FEN.to_string(),
                move_san: "Nf3".to_string(),
                side: "White".to_string(),
                tag: "Inaccuracy".to_string(),
                best_alt: Some("e4".to_string()),
                cp: "27->87 (Δ=60)".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_commentary_failure_keeps_analysis() {
        let commentator = Arc::new(RecordingCommentary::default());
        let services = services(Arc::new(nf3_engine())).with_commentary(commentator.clone());
        let server = ServerFactory::from_services(services).new_server(None);
        call_tool(&server, "move", json!({ "move": "Nf3" })).await.unwrap();

        let result = call_tool(&server, "analyzeLastMove", json!({})).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.structured_content["analysis"]["quality"], "inaccuracy");
        assert!(result.structured_content.get("commentary").is_none());
        assert_eq!(commentator.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_ai_move_blocks_concurrent_move() {
        let engine = Arc::new(GatedRecommender::new("e2e4", "e4"));
        let factory = ServerFactory::from_services(services(engine.clone()));
        let ai_server = factory.new_server(Some("shared"));
        let move_server = factory.new_server(Some("shared"));

        let ai = tokio::spawn(async move { call_tool(&ai_server, "aiMove", json!({})).await });
        engine.wait_until_called().await;

        // White to move: e5 is only legal once the engine's e4 has landed.
        let human = tokio::spawn(async move {
            call_tool(&move_server, "move", json!({ "move": "e5" })).await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!human.is_finished());
        assert!(factory.store().get("shared").try_lock().is_err());

        engine.release();
        let ai_result = ai.await.unwrap().unwrap();
        assert!(!ai_result.is_error, "{}", ai_result.summary());

        let human_result = human.await.unwrap().unwrap();
        assert!(!human_result.is_error, "{}", human_result.summary());
        assert_eq!(human_result.structured_content["moves"], json!(["e4", "e5"]));
    }
}
