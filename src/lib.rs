//! MCP hands-on - example Model Context Protocol servers and clients
//!
//! A set of small MCP servers that build on each other, from a single
//! greeting resource up to a persistent task manager, plus a client, demos
//! and a REST version of the task API for comparison.

pub mod config;
pub mod demo;
pub mod mcp;
pub mod rest;
pub mod servers;
pub mod tasks;
pub mod types;

pub use config::ConfigLoader;
pub use mcp::{McpClient, McpServer, McpService};
pub use servers::ServerKind;
pub use tasks::TaskStorage;
pub use types::HandsOnError;
