//! stdio transport for MCP JSON-RPC
//!
//! One connection is one session: every line is answered by a fresh server
//! bound to the configured session id.

use crate::ServerFactory;
use crate::mcp::{Request, Response};
use chess_mcp_core::{ChessError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Run the MCP server on stdin/stdout
pub async fn run(factory: ServerFactory, session_id: Option<String>) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    info!("chess-mcp server starting on stdio");
    serve(factory, session_id, reader, writer).await
}

/// Serve newline-delimited JSON-RPC from `reader`, writing responses to `writer`
pub async fn serve<R, W>(
    factory: ServerFactory,
    session_id: Option<String>,
    mut reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ChessError::Io(format!("Failed to read stdin: {}", e)))?;

        if bytes_read == 0 {
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => {
                let server = factory.new_server(session_id.as_deref());
                server.handle_request(&request).await
            }
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Some(Response::parse_error(format!("Parse error: {}", e)))
            }
        };

        let Some(response) = response else {
            continue;
        };
        let response_json = serde_json::to_string(&response)?;

        debug!("Sending: {}", response_json);

        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| ChessError::Io(format!("Failed to write stdout: {}", e)))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| ChessError::Io(format!("Failed to write newline: {}", e)))?;
        writer
            .flush()
            .await
            .map_err(|e| ChessError::Io(format!("Failed to flush stdout: {}", e)))?;
    }

    Ok(())
}
