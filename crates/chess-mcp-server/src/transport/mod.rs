//! Transports for MCP JSON-RPC

pub mod http;
pub mod stdio;
