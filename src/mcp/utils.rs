//! MCP utility functions

use crate::mcp::types::*;
use serde_json::{Value, json};

/// Create a successful MCP response
pub fn create_success_response(id: Value, result: Value) -> McpResponseMessage {
    McpResponseMessage {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        result: Some(result),
        error: None,
    }
}

/// Create an error MCP response
pub fn create_error_response(id: Value, code: i32, message: impl Into<String>) -> McpResponseMessage {
    McpResponseMessage {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        result: None,
        error: Some(McpErrorResponse {
            code,
            message: message.into(),
            data: None,
        }),
    }
}

/// Create text content
pub fn create_text_content(text: impl Into<String>) -> McpContent {
    McpContent::Text { text: text.into() }
}

/// Create tool list response
pub fn create_tool_list_response(tools: Vec<McpToolDefinition>) -> Value {
    json!({
        "tools": tools
    })
}

/// Create initialize response
pub fn create_initialize_response(server_name: &str) -> Value {
    json!({
        "protocolVersion": MCP_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": McpServerInfo {
            name: server_name.to_string(),
            version: crate::VERSION.to_string(),
        }
    })
}

/// Extract typed parameters, treating absent or null params as `{}`
pub fn extract_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
) -> Result<T, serde_json::Error> {
    match params {
        None | Some(Value::Null) => serde_json::from_value(json!({})),
        Some(value) => serde_json::from_value(value),
    }
}
