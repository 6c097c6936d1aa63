//! JSON-RPC method routing shared by all transports

use chess_mcp_core::error_codes;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ChessServer;
use crate::capabilities::{list_resources, list_tools};
use crate::mcp::{
    InitializeParams, InitializeResult, PROTOCOL_VERSION, Request, ResourcesCapability, Response,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::resources::read_resource;
use crate::tools::call_tool;

const INSTRUCTIONS: &str = "Play chess: read chess://board for the position, call move/aiMove to play, \
reset or getPuzzle to set up a position, analyzeLastMove to judge the last move.";

impl ChessServer {
    /// Answer one request. Notifications produce no response.
    pub async fn handle_request(&self, request: &Request) -> Option<Response> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => Response::success(id, serde_json::json!({})),
            "tools/list" => {
                Response::success(id, serde_json::json!({ "tools": list_tools() }))
            }
            "tools/call" => self.handle_tools_call(request).await,
            "resources/list" => {
                Response::success(id, serde_json::json!({ "resources": list_resources() }))
            }
            "resources/read" => self.handle_resources_read(request).await,
            _ => Response::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, request: &Request) -> Response {
        let params: serde_json::Result<InitializeParams> = match request.params {
            serde_json::Value::Null => Ok(InitializeParams::default()),
            ref params => serde_json::from_value(params.clone()),
        };
        let params = match params {
            Ok(p) => p,
            Err(e) => {
                return Response::error(
                    request.id.clone(),
                    error_codes::INVALID_PARAMS,
                    format!("Invalid initialize params: {}", e),
                );
            }
        };
        if let Some(client) = &params.client_info {
            debug!(client = %client.name, version = %client.version, "Client initializing");
        }

        let config = &self.services().config;
        let result = InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: config.name.clone(),
                version: config.version.clone(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        };

        match serde_json::to_value(result) {
            Ok(value) => Response::success(request.id.clone(), value),
            Err(e) => Response::error(
                request.id.clone(),
                error_codes::INTERNAL_ERROR,
                e.to_string(),
            ),
        }
    }

    async fn handle_tools_call(&self, request: &Request) -> Response {
        #[derive(Deserialize)]
        struct ToolCallParams {
            name: String,
            #[serde(default)]
            arguments: serde_json::Value,
        }

        let params: ToolCallParams = match serde_json::from_value(request.params.clone()) {
            Ok(p) => p,
            Err(e) => {
                return Response::error(
                    request.id.clone(),
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tool call params: {}", e),
                );
            }
        };

        match call_tool(self, &params.name, params.arguments).await {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => Response::success(request.id.clone(), value),
                Err(e) => Response::error(
                    request.id.clone(),
                    error_codes::INTERNAL_ERROR,
                    e.to_string(),
                ),
            },
            Err(e) => {
                warn!(tool = %params.name, "Rejected tool call: {}", e);
                Response::from_error(request.id.clone(), &e)
            }
        }
    }

    async fn handle_resources_read(&self, request: &Request) -> Response {
        #[derive(Deserialize)]
        struct ReadParams {
            uri: String,
        }

        let params: ReadParams = match serde_json::from_value(request.params.clone()) {
            Ok(p) => p,
            Err(e) => {
                return Response::error(
                    request.id.clone(),
                    error_codes::INVALID_PARAMS,
                    format!("Invalid read params: {}", e),
                );
            }
        };

        match read_resource(self, &params.uri).await {
            Ok(contents) => Response::success(
                request.id.clone(),
                serde_json::json!({ "contents": [contents] }),
            ),
            Err(e) => Response::from_error(request.id.clone(), &e),
        }
    }
}
