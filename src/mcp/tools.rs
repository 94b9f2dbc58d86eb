//! MCP tools implementation
//!
//! The server exposes a single tool, `pre_commit_run`.

use crate::mcp::types::{McpToolCallResult, McpToolDefinition};
use crate::mcp::utils::{create_text_content, extract_params};
use crate::pipeline::{PreCommitPipeline, RunRequest};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

pub const PRE_COMMIT_RUN: &str = "pre_commit_run";

/// Why a `tools/call` could not be dispatched
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Get all available MCP tools
pub fn get_available_tools() -> Vec<McpToolDefinition> {
    vec![McpToolDefinition {
        name: PRE_COMMIT_RUN.to_string(),
        description: "Run pre-commit hooks on the staged files of the enclosing git \
                      repository and return a structured report: overall status, hook \
                      counts, failures grouped by hook id, and files modified by auto-fixers."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "force_non_git": {
                    "type": "boolean",
                    "default": false,
                    "description": "Run even when the working directory is not inside a git repository"
                }
            },
            "additionalProperties": false
        }),
    }]
}

/// Execute a tool by name
///
/// Pipeline hard failures become an `isError` result; only dispatch problems
/// are returned as errors.
pub async fn execute_tool(
    pipeline: &PreCommitPipeline,
    name: &str,
    arguments: Option<Value>,
) -> Result<McpToolCallResult, ToolCallError> {
    match name {
        PRE_COMMIT_RUN => {
            let request: RunRequest =
                extract_params(arguments).map_err(|source| ToolCallError::InvalidArguments {
                    tool: name.to_string(),
                    source,
                })?;
            Ok(pre_commit_run(pipeline, request).await)
        }
        other => Err(ToolCallError::UnknownTool(other.to_string())),
    }
}

async fn pre_commit_run(pipeline: &PreCommitPipeline, request: RunRequest) -> McpToolCallResult {
    info!("pre_commit_run called (force_non_git={})", request.force_non_git);

    match pipeline.run(request).await {
        Ok(report) => {
            let body = serde_json::to_value(&report).unwrap_or_else(|e| {
                json!({ "status": "system_error", "error": format!("Failed to encode report: {e}") })
            });
            tool_result(body, false)
        }
        Err(e) => {
            warn!("pre_commit_run failed: {}", e);
            let body = json!({
                "status": e.status(),
                "error": e.summary(),
            });
            tool_result(body, true)
        }
    }
}

fn tool_result(body: Value, is_error: bool) -> McpToolCallResult {
    McpToolCallResult {
        content: vec![create_text_content(body.to_string())],
        structured_content: Some(body),
        is_error,
    }
}
