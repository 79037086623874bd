use thiserror::Error;

use crate::mcp::protocol::{JsonRpcError, INTERNAL_ERROR, INVALID_PARAMS, RESOURCE_NOT_FOUND};

#[derive(Error, Debug)]
pub enum HandsOnError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Cannot divide by zero")]
    DivisionByZero,

    #[error("No weather data for {0}")]
    UnknownCity(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("MCP protocol error: {0}")]
    ProtocolError(String),

    #[error("Server returned error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HandsOnError {
    /// JSON-RPC error code used when this error escapes a request handler
    pub fn rpc_code(&self) -> i32 {
        match self {
            HandsOnError::UnknownResource(_) | HandsOnError::TaskNotFound(_) => RESOURCE_NOT_FOUND,
            HandsOnError::UnknownTool(_) | HandsOnError::UnknownPrompt(_) => INVALID_PARAMS,
            HandsOnError::InvalidArguments(_) | HandsOnError::Json(_) => INVALID_PARAMS,
            HandsOnError::Rpc { code, .. } => *code,
            _ => INTERNAL_ERROR,
        }
    }
}

impl From<HandsOnError> for JsonRpcError {
    fn from(err: HandsOnError) -> Self {
        JsonRpcError::new(err.rpc_code(), err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HandsOnError>;
