//! One server offering a resource, a tool and a prompt

use crate::mcp::protocol::{
    CallToolResult, GetPromptResult, Prompt, ReadResourceResult, Resource, ServerCapabilities,
    ServerInfo, Tool,
};
use crate::mcp::service::{capabilities, into_tool_result, parse_args, unknown_tool, McpService};
use crate::servers::format_number;
use crate::servers::prompts::{write_email, write_email_prompt};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

const INFO_URI: &str = "info://server";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SimpleOp {
    Add,
    Multiply,
}

#[derive(Debug, Deserialize)]
struct SimpleCalcArgs {
    a: f64,
    b: f64,
    op: SimpleOp,
}

pub struct FullFeaturedServer;

#[async_trait]
impl McpService for FullFeaturedServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("full-featured-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(true, true, true)
    }

    async fn resources(&self) -> Result<Vec<Resource>> {
        Ok(vec![Resource {
            uri: INFO_URI.to_string(),
            name: "Server information".to_string(),
            description: Some("What this server offers".to_string()),
            mime_type: Some("text/plain".to_string()),
        }])
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        if uri != INFO_URI {
            return Err(HandsOnError::UnknownResource(uri.to_string()));
        }
        Ok(ReadResourceResult::single(
            uri,
            "text/plain",
            "Full-Featured MCP Server\n\n\
             This server provides:\n\
             - Resource: server information\n\
             - Tool: calculator\n\
             - Prompt: email template"
                .to_string(),
        ))
    }

    fn tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: "calculate".to_string(),
            description: "Run a simple calculation".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "a": { "type": "number" },
                    "b": { "type": "number" },
                    "op": { "type": "string", "enum": ["add", "multiply"] }
                },
                "required": ["a", "b", "op"]
            }),
        }]
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        if name != "calculate" {
            return unknown_tool(name);
        }

        let outcome = parse_args::<SimpleCalcArgs>(arguments).map(|args| {
            let result = match args.op {
                SimpleOp::Add => args.a + args.b,
                SimpleOp::Multiply => args.a * args.b,
            };
            format!("Result: {}", format_number(result))
        });

        into_tool_result(name, outcome)
    }

    fn prompts(&self) -> Vec<Prompt> {
        vec![write_email_prompt()]
    }

    async fn get_prompt(&self, name: &str, arguments: &Map<String, Value>) -> Result<GetPromptResult> {
        match name {
            "write_email" => Ok(write_email(arguments)),
            _ => Err(HandsOnError::UnknownPrompt(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_calculate() {
        let result = FullFeaturedServer
            .call_tool("calculate", json!({"a": 6, "b": 7, "op": "multiply"}))
            .await;
        assert_eq!(result.joined_text(), "Result: 42");
    }

    #[tokio::test]
    async fn test_info_resource() {
        let result = FullFeaturedServer.read_resource(INFO_URI).await.unwrap();
        assert!(result.contents[0].text.starts_with("Full-Featured MCP Server"));
        assert!(FullFeaturedServer.read_resource("info://other").await.is_err());
    }

    #[tokio::test]
    async fn test_only_email_prompt() {
        assert_eq!(FullFeaturedServer.prompts().len(), 1);
        assert!(FullFeaturedServer
            .get_prompt("code_review", &Map::new())
            .await
            .is_err());
    }
}
