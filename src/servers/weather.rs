//! Mock weather lookup tools

use crate::config::CityWeather;
use crate::mcp::protocol::{CallToolResult, ServerCapabilities, ServerInfo, Tool};
use crate::mcp::service::{capabilities, into_tool_result, parse_args, unknown_tool, McpService};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct CityArgs {
    #[serde(default)]
    pub(crate) city: String,
}

pub(crate) fn city_tool() -> Tool {
    Tool {
        name: "get_weather".to_string(),
        description: "Get the weather for a city".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name (e.g. Tokyo, Osaka, Sapporo)"
                }
            },
            "required": ["city"]
        }),
    }
}

pub struct WeatherServer {
    cities: Vec<CityWeather>,
}

impl WeatherServer {
    pub fn new(cities: Vec<CityWeather>) -> Self {
        Self { cities }
    }

    fn get_weather(&self, args: CityArgs) -> Result<String> {
        if args.city.trim().is_empty() {
            return Err(HandsOnError::InvalidArguments("city is required".to_string()));
        }

        // An unknown city is an answer, not a failure
        let Some(weather) = self.cities.iter().find(|w| w.city == args.city) else {
            return Ok(format!(
                "❌ No weather data for {}. Available cities: {}",
                args.city,
                self.city_names().join(", ")
            ));
        };

        Ok(format!(
            "{} **Weather in {}**\n\nTemperature: {}°C\nCondition: {}\nHumidity: {}%",
            weather.condition.icon(),
            weather.city,
            weather.temp,
            weather.condition.label(),
            weather.humidity
        ))
    }

    fn list_cities(&self) -> String {
        let mut output = format!("📍 **Available cities** ({})\n\n", self.cities.len());
        output.push_str(
            &self
                .cities
                .iter()
                .map(|w| format!("- {}", w.city))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        output
    }

    fn city_names(&self) -> Vec<&str> {
        self.cities.iter().map(|w| w.city.as_str()).collect()
    }
}

#[async_trait]
impl McpService for WeatherServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("weather-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(true, false, false)
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            city_tool(),
            Tool {
                name: "list_cities".to_string(),
                description: "List the cities with weather data".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {}
                }),
            },
        ]
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        match name {
            "get_weather" => {
                let outcome = parse_args::<CityArgs>(arguments).and_then(|a| self.get_weather(a));
                into_tool_result(name, outcome)
            }
            "list_cities" => CallToolResult::text(self.list_cities()),
            _ => unknown_tool(name),
        }
    }
}
