//! MCP server implementation
//!
//! Runs the JSON-RPC request loop for one [`McpService`] over stdio, or over
//! any async reader/writer pair.

use crate::mcp::protocol::*;
use crate::mcp::service::McpService;
use anyhow::Result;
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

/// Maximum accepted size of a single JSON-RPC line (16 MB)
pub const MAX_LINE_LENGTH: usize = 16 * 1024 * 1024;

pub struct McpServer<S: McpService> {
    service: Arc<S>,
    initialized: AtomicBool,
}

impl<S: McpService> McpServer<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            initialized: AtomicBool::new(false),
        }
    }

    /// Run the MCP server on stdin/stdout until the client disconnects
    pub async fn run(&self) -> Result<()> {
        info!("MCP server '{}' starting on stdio", self.service.info().name);
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC messages from `reader`, answering on `writer`
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!("Dropping message larger than {} bytes", MAX_LINE_LENGTH);
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::new(INVALID_REQUEST, "Message too large"),
                    );
                    write_message(&mut writer, &response).await?;
                    continue;
                }
                Err(LinesCodecError::Io(e)) => {
                    error!("Failed to read line: {}", e);
                    return Err(e.into());
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("Received message: {}", line);

            if let Some(response) = self.handle_message(line).await {
                write_message(&mut writer, &response).await?;
                debug!("Sent response");
            }
        }

        info!("Client closed connection");
        Ok(())
    }

    /// Handle one raw message; notifications produce no response
    async fn handle_message(&self, content: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let fallback_id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                fallback_id,
                JsonRpcError::new(INVALID_REQUEST, "Only JSON-RPC 2.0 is supported"),
            ));
        }

        if request.id == Some(Value::Null) {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::new(INVALID_REQUEST, "Request id must not be null"),
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match self.handle_request(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        };
        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => debug!("Client finished initialization"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            other => debug!("Ignoring notification: {}", other),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Result<Value, JsonRpcError> {
        let method = request.method.as_str();

        match method {
            "initialize" => return self.handle_initialize(request.params),
            "ping" => return Ok(serde_json::json!({})),
            _ => {}
        }

        if !self.initialized.load(Ordering::SeqCst) {
            return Err(JsonRpcError::new(INTERNAL_ERROR, "Server not initialized"));
        }

        let caps = self.service.capabilities();
        match method {
            "tools/list" if caps.tools.is_some() => self.handle_list_tools(),
            "tools/call" if caps.tools.is_some() => self.handle_call_tool(request.params).await,
            "resources/list" if caps.resources.is_some() => self.handle_list_resources().await,
            "resources/read" if caps.resources.is_some() => {
                self.handle_read_resource(request.params).await
            }
            "prompts/list" if caps.prompts.is_some() => self.handle_list_prompts(),
            "prompts/get" if caps.prompts.is_some() => self.handle_get_prompt(request.params).await,
            _ => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            )),
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = parse_params(params, "initialize")?;

        if let Some(client) = &params.client_info {
            info!("Client connected: {} {}", client.name, client.version);
        }

        self.initialized.store(true, Ordering::SeqCst);

        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: self.service.capabilities(),
            server_info: self.service.info(),
        })
    }

    fn handle_list_tools(&self) -> Result<Value, JsonRpcError> {
        to_result(ListToolsResult {
            tools: self.service.tools(),
        })
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params, "tool call")?;
        debug!("Calling tool: {}", params.name);

        let result = self
            .service
            .call_tool(&params.name, params.arguments.unwrap_or(Value::Null))
            .await;

        to_result(result)
    }

    async fn handle_list_resources(&self) -> Result<Value, JsonRpcError> {
        let resources = self.service.resources().await?;
        to_result(ListResourcesResult { resources })
    }

    async fn handle_read_resource(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params, "resource read")?;
        debug!("Reading resource: {}", params.uri);

        let result = self.service.read_resource(&params.uri).await?;
        to_result(result)
    }

    fn handle_list_prompts(&self) -> Result<Value, JsonRpcError> {
        to_result(ListPromptsResult {
            prompts: self.service.prompts(),
        })
    }

    async fn handle_get_prompt(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: GetPromptParams = parse_params(params, "prompt")?;
        let arguments = params.arguments.unwrap_or_default();

        let result = self.service.get_prompt(&params.name, &arguments).await?;
        to_result(result)
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
    what: &str,
) -> Result<T, JsonRpcError> {
    let params = match params {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(p) => p,
    };
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid {} params: {}", what, e)))
}

fn to_result<T: Serialize>(result: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(result).map_err(|e| {
        JsonRpcError::new(INTERNAL_ERROR, format!("Failed to serialize result: {}", e))
    })
}

async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let json = serde_json::to_string(response)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
