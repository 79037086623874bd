//! MCP protocol plumbing: wire types, the server loop, the service seam and a client

pub mod client;
pub mod protocol;
pub mod server;
pub mod service;

pub use client::McpClient;
pub use server::McpServer;
pub use service::McpService;
