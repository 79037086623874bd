//! The smallest possible server: one static text resource

use crate::mcp::protocol::{ReadResourceResult, Resource, ServerCapabilities, ServerInfo};
use crate::mcp::service::{capabilities, McpService};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;

const GREETING_URI: &str = "hello://greeting";

pub struct HelloServer;

#[async_trait]
impl McpService for HelloServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("hello-mcp-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(false, true, false)
    }

    async fn resources(&self) -> Result<Vec<Resource>> {
        Ok(vec![Resource {
            uri: GREETING_URI.to_string(),
            name: "Hello Greeting".to_string(),
            description: Some("A simple greeting message".to_string()),
            mime_type: Some("text/plain".to_string()),
        }])
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        if uri == GREETING_URI {
            return Ok(ReadResourceResult::single(
                uri,
                "text/plain",
                "Hello, MCP World! 🌍".to_string(),
            ));
        }
        Err(HandsOnError::UnknownResource(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_greeting() {
        let resources = HelloServer.resources().await.unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, GREETING_URI);
    }

    #[tokio::test]
    async fn test_unknown_uri() {
        let err = HelloServer.read_resource("hello://other").await.unwrap_err();
        assert!(matches!(err, HandsOnError::UnknownResource(_)));
    }
}
