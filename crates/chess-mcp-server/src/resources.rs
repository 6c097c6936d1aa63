//! MCP resource handlers

use chess_mcp_core::{ChessError, Result, board};
use serde::Serialize;

use crate::ChessServer;
use crate::capabilities::{BOARD_URI, WIDGET_HTML, WIDGET_MIME, WIDGET_URI};

/// One entry of a resources/read result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Read a resource by uri
pub async fn read_resource(server: &ChessServer, uri: &str) -> Result<ResourceContents> {
    match uri {
        BOARD_URI => {
            let game = server.game().lock().await;
            Ok(ResourceContents {
                uri: uri.to_string(),
                mime_type: "text/plain".to_string(),
                text: board::render_game(&game),
            })
        }
        WIDGET_URI => Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: WIDGET_MIME.to_string(),
            text: WIDGET_HTML.to_string(),
        }),
        _ => Err(ChessError::ResourceNotFound(uri.to_string())),
    }
}
