//! The seam between the protocol loop and an example server
//!
//! Each example server implements [`McpService`]. Every capability has a
//! default that behaves as if the server did not offer it, so a server only
//! overrides the parts it actually provides and advertises those in
//! [`McpService::capabilities`].

use crate::mcp::protocol::{
    CallToolResult, GetPromptResult, Prompt, ReadResourceResult, Resource, ServerCapabilities,
    ServerInfo, Tool,
};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

#[async_trait]
pub trait McpService: Send + Sync {
    /// Name and version reported in `initialize`
    fn info(&self) -> ServerInfo;

    fn capabilities(&self) -> ServerCapabilities;

    fn tools(&self) -> Vec<Tool> {
        Vec::new()
    }

    async fn call_tool(&self, name: &str, _arguments: Value) -> CallToolResult {
        unknown_tool(name)
    }

    async fn resources(&self) -> Result<Vec<Resource>> {
        Ok(Vec::new())
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        Err(HandsOnError::UnknownResource(uri.to_string()))
    }

    fn prompts(&self) -> Vec<Prompt> {
        Vec::new()
    }

    async fn get_prompt(&self, name: &str, _arguments: &Map<String, Value>) -> Result<GetPromptResult> {
        Err(HandsOnError::UnknownPrompt(name.to_string()))
    }
}

/// Builds the capability object from the features a server offers
pub fn capabilities(tools: bool, resources: bool, prompts: bool) -> ServerCapabilities {
    let empty = || Some(serde_json::json!({}));
    ServerCapabilities {
        experimental: None,
        logging: None,
        prompts: if prompts { empty() } else { None },
        resources: if resources { empty() } else { None },
        tools: if tools { empty() } else { None },
    }
}

/// Deserialize tool arguments, treating a missing object as `{}`
pub fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| HandsOnError::InvalidArguments(e.to_string()))
}

/// Turn a handler outcome into an in-band tool result
pub fn into_tool_result(tool: &str, outcome: Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::text(text),
        Err(e) => {
            warn!("{} failed: {}", tool, e);
            CallToolResult::error(format!("Error: {}", e))
        }
    }
}

/// In-band error for a tool the server does not offer
pub fn unknown_tool(name: &str) -> CallToolResult {
    into_tool_result(name, Err(HandsOnError::UnknownTool(name.to_string())))
}

/// String prompt argument, falling back when absent or blank
pub fn prompt_arg<'a>(arguments: &'a Map<String, Value>, name: &str, default: &'a str) -> &'a str {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}
