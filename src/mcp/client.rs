//! MCP client implementation
//!
//! Talks to a single MCP server over newline-delimited JSON-RPC. The server is
//! usually a spawned child process, but any async reader/writer pair works.

use crate::mcp::protocol::*;
use crate::types::{HandsOnError, Result};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, error, info, warn};

use super::server::MAX_LINE_LENGTH;

const REQUEST_TIMEOUT_SECS: u64 = 30;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

#[derive(Debug, Serialize)]
struct OutgoingRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Serialize)]
struct OutgoingNotification<'a> {
    jsonrpc: &'static str,
    method: &'a str,
}

/// MCP client for a single server
pub struct McpClient {
    next_id: AtomicU64,

    /// Requests waiting for their response, keyed by id
    pending: PendingMap,

    /// Lines queued for the writer task
    outgoing: mpsc::UnboundedSender<String>,

    /// Result of the `initialize` handshake
    server: InitializeResult,

    child: Mutex<Option<Child>>,
}

impl McpClient {
    /// Spawn `program` as an MCP server and complete the handshake
    pub async fn spawn<I, A>(program: impl AsRef<OsStr>, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let program = program.as_ref();
        info!("Spawning MCP server: {}", program.to_string_lossy());

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                HandsOnError::ProtocolError(format!(
                    "Failed to spawn {}: {}",
                    program.to_string_lossy(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HandsOnError::ProtocolError("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HandsOnError::ProtocolError("Failed to get stdout".to_string()))?;

        Self::start(stdout, stdin, Some(child)).await
    }

    /// Complete the handshake with a server reachable through `reader`/`writer`
    pub async fn connect<R, W>(reader: R, writer: W) -> Result<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self::start(reader, writer, None).await
    }

    async fn start<R, W>(reader: R, writer: W, child: Option<Child>) -> Result<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(Self::write_loop(writer, outgoing_rx));
        tokio::spawn(Self::read_loop(reader, Arc::clone(&pending)));

        let next_id = AtomicU64::new(1);
        let server: InitializeResult = Self::request_with(
            &next_id,
            &pending,
            &outgoing,
            "initialize",
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
        .await?;

        let client = Self {
            next_id,
            pending,
            outgoing,
            server,
            child: Mutex::new(child),
        };
        client.notify("notifications/initialized")?;

        info!(
            "Connected to MCP server {} v{}",
            client.server.server_info.name, client.server.server_info.version
        );
        Ok(client)
    }

    async fn write_loop<W: AsyncWrite + Unpin>(
        mut writer: W,
        mut outgoing_rx: mpsc::UnboundedReceiver<String>,
    ) {
        while let Some(message) = outgoing_rx.recv().await {
            if let Err(e) = writer.write_all(message.as_bytes()).await {
                error!("Failed to write message: {}", e);
                break;
            }
            if let Err(e) = writer.write_all(b"\n").await {
                error!("Failed to write message: {}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                error!("Failed to flush: {}", e);
                break;
            }
        }
        let _ = writer.shutdown().await;
    }

    async fn read_loop<R: AsyncRead + Unpin>(reader: R, pending: PendingMap) {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    debug!("Received message: {}", line);
                    Self::dispatch(&line, &pending).await;
                }
                Err(e) => {
                    error!("Failed to read from server: {}", e);
                    break;
                }
            }
        }

        warn!("MCP server closed its output");
        // Dropping the senders wakes every waiter with a closed-channel error
        pending.lock().await.clear();
    }

    async fn dispatch(line: &str, pending: &PendingMap) {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring unparseable message: {}", e);
                return;
            }
        };

        if let Some(method) = message.get("method").and_then(Value::as_str) {
            debug!("Ignoring server-initiated message: {}", method);
            return;
        }

        let response: JsonRpcResponse = match serde_json::from_value(message) {
            Ok(response) => response,
            Err(e) => {
                warn!("Unknown message type: {}", e);
                return;
            }
        };

        let Some(id) = response.id.as_u64() else {
            warn!("Response with unexpected id: {}", response.id);
            return;
        };

        if let Some(sender) = pending.lock().await.remove(&id) {
            let result = match (response.result, response.error) {
                (_, Some(error)) => Err(HandsOnError::Rpc {
                    code: error.code,
                    message: error.message,
                }),
                (Some(result), None) => Ok(result),
                (None, None) => Err(HandsOnError::ProtocolError(
                    "No result or error".to_string(),
                )),
            };
            let _ = sender.send(result);
        }
    }

    async fn request_with<R: DeserializeOwned>(
        next_id: &AtomicU64,
        pending: &PendingMap,
        outgoing: &mpsc::UnboundedSender<String>,
        method: &str,
        params: Value,
    ) -> Result<R> {
        let id = next_id.fetch_add(1, Ordering::SeqCst);
        let message = serde_json::to_string(&OutgoingRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })?;
        debug!("Sending request {}: {}", id, method);

        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(id, tx);

        if outgoing.send(message).is_err() {
            pending.lock().await.remove(&id);
            return Err(HandsOnError::ProtocolError("Failed to send request".to_string()));
        }

        let result = match timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), rx).await {
            Ok(received) => received
                .map_err(|_| HandsOnError::ProtocolError("Server connection closed".to_string()))??,
            Err(_) => {
                pending.lock().await.remove(&id);
                return Err(HandsOnError::Timeout(REQUEST_TIMEOUT_SECS));
            }
        };

        serde_json::from_value(result).map_err(|e| {
            HandsOnError::ProtocolError(format!("Failed to parse {} response: {}", method, e))
        })
    }

    async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        Self::request_with(&self.next_id, &self.pending, &self.outgoing, method, params).await
    }

    fn notify(&self, method: &str) -> Result<()> {
        let message = serde_json::to_string(&OutgoingNotification {
            jsonrpc: "2.0",
            method,
        })?;
        debug!("Sending notification: {}", method);
        self.outgoing
            .send(message)
            .map_err(|_| HandsOnError::ProtocolError("Failed to send notification".to_string()))
    }

    /// Name and version the server reported
    pub fn server_info(&self) -> &ServerInfo {
        &self.server.server_info
    }

    pub fn server_capabilities(&self) -> &ServerCapabilities {
        &self.server.capabilities
    }

    pub async fn ping(&self) -> Result<()> {
        let _: Value = self.request("ping", serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        let result: ListToolsResult = self.request("tools/list", serde_json::json!({})).await?;
        Ok(result.tools)
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult> {
        self.request(
            "tools/call",
            serde_json::json!({ "name": name, "arguments": arguments }),
        )
        .await
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        let result: ListResourcesResult =
            self.request("resources/list", serde_json::json!({})).await?;
        Ok(result.resources)
    }

    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        self.request("resources/read", serde_json::json!({ "uri": uri }))
            .await
    }

    pub async fn list_prompts(&self) -> Result<Vec<Prompt>> {
        let result: ListPromptsResult = self.request("prompts/list", serde_json::json!({})).await?;
        Ok(result.prompts)
    }

    pub async fn get_prompt(&self, name: &str, arguments: Map<String, Value>) -> Result<GetPromptResult> {
        self.request(
            "prompts/get",
            serde_json::json!({ "name": name, "arguments": arguments }),
        )
        .await
    }

    /// Close the connection and wait for a spawned server to exit
    pub async fn close(self) -> Result<()> {
        let McpClient { outgoing, child, .. } = self;
        // Closing the channel ends the writer, which closes the server's stdin
        drop(outgoing);

        if let Some(mut child) = child.into_inner() {
            match timeout(Duration::from_secs(5), child.wait()).await {
                Ok(status) => debug!("MCP server exited with {}", status?),
                Err(_) => {
                    warn!("MCP server did not exit, killing it");
                    child.kill().await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::server::McpServer;
    use crate::servers::{CalculatorServer, HelloServer};

    async fn connect_to<S: crate::mcp::McpService + 'static>(service: S) -> McpClient {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_io);
        tokio::spawn(async move {
            let server = McpServer::new(Arc::new(service));
            server.serve(server_read, server_write).await
        });

        let (client_read, client_write) = tokio::io::split(client_io);
        McpClient::connect(client_read, client_write).await.unwrap()
    }

    #[tokio::test]
    async fn test_handshake_and_resources() {
        let client = connect_to(HelloServer).await;
        assert_eq!(client.server_info().name, "hello-mcp-server");
        assert!(client.server_capabilities().resources.is_some());
        client.ping().await.unwrap();

        let resources = client.list_resources().await.unwrap();
        assert_eq!(resources[0].uri, "hello://greeting");

        let read = client.read_resource("hello://greeting").await.unwrap();
        assert_eq!(read.contents[0].text, "Hello, MCP World! 🌍");
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_server_errors_keep_their_code() {
        let client = connect_to(HelloServer).await;

        let err = client.read_resource("hello://nothing").await.unwrap_err();
        assert_eq!(err.rpc_code(), RESOURCE_NOT_FOUND);

        let err = client.list_tools().await.unwrap_err();
        assert_eq!(err.rpc_code(), METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let client = connect_to(CalculatorServer).await;
        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools.len(), 4);

        let result = client
            .call_tool("divide", serde_json::json!({"a": 1, "b": 0}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.joined_text(), "Error: Cannot divide by zero");
    }
}
