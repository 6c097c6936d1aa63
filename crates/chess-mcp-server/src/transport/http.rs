//! HTTP transport for MCP JSON-RPC
//!
//! Stateless on the wire: each POST builds a new server through the factory,
//! bound to the session named by the `Mcp-Session-Id` header.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::{get, post},
};
use chess_mcp_core::Result;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::ServerFactory;
use crate::mcp::{Request, Response};

/// Header carrying the session id
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Build the axum router
pub fn router(factory: ServerFactory) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(factory)
}

/// Serve the router on `addr` until the listener fails
pub async fn serve(factory: ServerFactory, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "chess-mcp server listening on http://{}/mcp", addr);
    axum::serve(listener, router(factory)).await?;
    Ok(())
}

/// GET /health
async fn health_handler(State(factory): State<ServerFactory>) -> impl IntoResponse {
    let config = &factory.services().config;
    Json(serde_json::json!({
        "status": "ok",
        "service": config.name,
        "version": config.version,
    }))
}

/// POST /mcp: one JSON-RPC message per request
async fn mcp_handler(
    State(factory): State<ServerFactory>,
    headers: HeaderMap,
    body: String,
) -> HttpResponse {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let request: Request = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            let response = Response::parse_error(format!("Parse error: {}", e));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let server = factory.new_server(session_id);
    debug!(session = server.session_id(), method = %request.method, "HTTP request");

    match server.handle_request(&request).await {
        Some(response) => (
            StatusCode::OK,
            [(SESSION_HEADER, server.session_id().to_string())],
            Json(response),
        )
            .into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
