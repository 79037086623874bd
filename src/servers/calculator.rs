//! Arithmetic tools

use crate::mcp::protocol::{CallToolResult, ServerCapabilities, ServerInfo, Tool};
use crate::mcp::service::{capabilities, into_tool_result, parse_args, unknown_tool, McpService};
use crate::servers::format_number;
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Operation::Add),
            "subtract" => Some(Operation::Subtract),
            "multiply" => Some(Operation::Multiply),
            "divide" => Some(Operation::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

pub fn calculate(a: f64, b: f64, op: Operation) -> Result<f64> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide if b == 0.0 => Err(HandsOnError::DivisionByZero),
        Operation::Divide => Ok(a / b),
    }
}

/// `a <symbol> b = result`
pub fn format_equation(a: f64, b: f64, op: Operation, result: f64) -> String {
    format!(
        "{} {} {} = {}",
        format_number(a),
        op.symbol(),
        format_number(b),
        format_number(result)
    )
}

#[derive(Debug, Deserialize)]
struct OperandArgs {
    a: f64,
    b: f64,
}

fn binary_tool(name: &str, description: &str, a: &str, b: &str) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "a": { "type": "number", "description": a },
                "b": { "type": "number", "description": b }
            },
            "required": ["a", "b"]
        }),
    }
}

pub struct CalculatorServer;

#[async_trait]
impl McpService for CalculatorServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("calculator-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(true, false, false)
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            binary_tool("add", "Add two numbers", "First number", "Second number"),
            binary_tool("subtract", "Subtract two numbers (a - b)", "Minuend", "Subtrahend"),
            binary_tool("multiply", "Multiply two numbers", "First number", "Second number"),
            binary_tool("divide", "Divide two numbers (a ÷ b)", "Dividend", "Divisor (must not be 0)"),
        ]
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let Some(op) = Operation::from_name(name) else {
            return unknown_tool(name);
        };

        let outcome = parse_args::<OperandArgs>(arguments).and_then(|args| {
            let result = calculate(args.a, args.b, op)?;
            Ok(format_equation(args.a, args.b, op, result))
        });

        into_tool_result(name, outcome)
    }
}
