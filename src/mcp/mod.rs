//! Model Context Protocol (MCP) server implementation
//!
//! Newline-delimited JSON-RPC 2.0 over a reader/writer pair (stdin/stdout in
//! production). Requests are handled one at a time in arrival order, so at
//! most one hook run is in flight per server.

use crate::config::Config;
use crate::pipeline::PreCommitPipeline;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

pub mod tools;
pub mod types;
pub mod utils;

use types::*;
use utils::*;

/// MCP server state
#[derive(Debug, Clone)]
pub struct McpServer {
    pipeline: PreCommitPipeline,
    server_name: String,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(config: &Config) -> Self {
        Self::with_pipeline(PreCommitPipeline::new(config), &config.server.name)
    }

    pub fn with_pipeline(pipeline: PreCommitPipeline, server_name: &str) -> Self {
        Self {
            pipeline,
            server_name: server_name.to_string(),
        }
    }

    /// Serve until `reader` reaches end of input
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server '{}' listening on stdio", self.server_name);

        let mut line = String::new();
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .await
                .context("Failed to read from MCP client")?;
            if read == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut encoded =
                    serde_json::to_string(&response).context("Failed to encode response")?;
                encoded.push('\n');
                writer
                    .write_all(encoded.as_bytes())
                    .await
                    .context("Failed to write to MCP client")?;
                writer.flush().await.context("Failed to flush MCP client")?;
            }
        }

        info!("MCP client closed the connection");
        Ok(())
    }

    /// Handle one raw message; notifications yield no response
    pub async fn handle_message(&self, raw: &str) -> Option<McpResponseMessage> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(create_error_response(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let request: McpRequestMessage = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Some(create_error_response(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ));
            }
        };

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        Some(self.handle_request(id, request).await)
    }

    async fn handle_request(&self, id: Value, request: McpRequestMessage) -> McpResponseMessage {
        debug!("Request: {}", request.method);

        match request.method.as_str() {
            "initialize" => {
                create_success_response(id, create_initialize_response(&self.server_name))
            }
            "ping" => create_success_response(id, json!({})),
            "tools/list" => {
                create_success_response(id, create_tool_list_response(tools::get_available_tools()))
            }
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => create_error_response(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        }
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> McpResponseMessage {
        let call: McpToolCallRequest = match extract_params(params) {
            Ok(call) => call,
            Err(e) => {
                return create_error_response(id, INVALID_PARAMS, format!("Invalid params: {e}"));
            }
        };

        match tools::execute_tool(&self.pipeline, &call.name, call.arguments).await {
            Ok(result) => encode_tool_result(id, &result),
            Err(e) => create_error_response(id, INVALID_PARAMS, e.to_string()),
        }
    }
}

/// Wrap a tool result; a result that cannot be encoded is a server fault
fn encode_tool_result<T: serde::Serialize>(id: Value, result: &T) -> McpResponseMessage {
    match serde_json::to_value(result) {
        Ok(value) => create_success_response(id, value),
        Err(e) => {
            warn!("Failed to encode tool result: {}", e);
            create_error_response(
                id,
                INTERNAL_ERROR,
                format!("Internal error: failed to encode tool result: {e}"),
            )
        }
    }
}
