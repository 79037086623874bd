//! Calculator and weather tools behind a single server

use crate::config::CityWeather;
use crate::mcp::protocol::{CallToolResult, ServerCapabilities, ServerInfo, Tool};
use crate::mcp::service::{capabilities, into_tool_result, parse_args, unknown_tool, McpService};
use crate::servers::calculator::{calculate, format_equation, Operation};
use crate::servers::weather::{city_tool, CityArgs};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct CalculateArgs {
    operation: Operation,
    a: f64,
    b: f64,
}

pub struct MultiToolServer {
    cities: Vec<CityWeather>,
}

impl MultiToolServer {
    pub fn new(cities: Vec<CityWeather>) -> Self {
        Self { cities }
    }

    fn calculate(&self, args: CalculateArgs) -> Result<String> {
        let result = calculate(args.a, args.b, args.operation)?;
        Ok(format!(
            "🧮 {}",
            format_equation(args.a, args.b, args.operation, result)
        ))
    }

    fn get_weather(&self, args: CityArgs) -> Result<String> {
        let weather = self
            .cities
            .iter()
            .find(|w| w.city == args.city)
            .ok_or(HandsOnError::UnknownCity(args.city))?;

        Ok(format!(
            "{} {}: {}°C, {}",
            weather.condition.icon(),
            weather.city,
            weather.temp,
            weather.condition.label()
        ))
    }
}

#[async_trait]
impl McpService for MultiToolServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("multi-tool-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(true, false, false)
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "calculate".to_string(),
                description: "Perform basic arithmetic".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "operation": {
                            "type": "string",
                            "enum": ["add", "subtract", "multiply", "divide"],
                            "description": "Kind of operation"
                        },
                        "a": { "type": "number", "description": "First number" },
                        "b": { "type": "number", "description": "Second number" }
                    },
                    "required": ["operation", "a", "b"]
                }),
            },
            city_tool(),
        ]
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let outcome = match name {
            "calculate" => parse_args::<CalculateArgs>(arguments).and_then(|a| self.calculate(a)),
            "get_weather" => parse_args::<CityArgs>(arguments).and_then(|a| self.get_weather(a)),
            _ => return unknown_tool(name),
        };
        into_tool_result(name, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_weather;
    use serde_json::json;

    fn server() -> MultiToolServer {
        MultiToolServer::new(default_weather())
    }

    #[tokio::test]
    async fn test_calculate() {
        let result = server()
            .call_tool("calculate", json!({"operation": "add", "a": 10, "b": 20}))
            .await;
        assert_eq!(result.joined_text(), "🧮 10 + 20 = 30");
    }

    #[tokio::test]
    async fn test_calculate_rejects_unknown_operation() {
        let result = server()
            .call_tool("calculate", json!({"operation": "pow", "a": 2, "b": 3}))
            .await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_weather_one_liner() {
        let result = server().call_tool("get_weather", json!({"city": "Tokyo"})).await;
        assert_eq!(result.joined_text(), "☀️ Tokyo: 22°C, Sunny");
    }

    #[tokio::test]
    async fn test_unknown_city_is_error() {
        let result = server().call_tool("get_weather", json!({"city": "Lima"})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.joined_text(), "Error: No weather data for Lima");
    }
}
