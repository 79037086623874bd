//! The example MCP servers
//!
//! Each module is one self-contained server built on [`McpService`]. The
//! [`ServerKind`] enum is how the CLI picks one to run over stdio.

pub mod calculator;
pub mod catalog;
pub mod full;
pub mod hello;
pub mod multi_tool;
pub mod prompts;
pub mod task_manager;
pub mod weather;

use crate::config::ConfigLoader;
use crate::mcp::{McpServer, McpService};
use crate::tasks::TaskStorage;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub use calculator::CalculatorServer;
pub use catalog::CatalogServer;
pub use full::FullFeaturedServer;
pub use hello::HelloServer;
pub use multi_tool::MultiToolServer;
pub use prompts::PromptTemplateServer;
pub use task_manager::TaskManagerServer;
pub use weather::WeatherServer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerKind {
    /// A single greeting resource
    Hello,
    /// Book catalog resources
    Library,
    /// Movie catalog resources
    Media,
    /// Four arithmetic tools
    Calculator,
    /// Mock weather tools
    Weather,
    /// Calculator and weather in one server
    MultiTool,
    /// Prompt templates
    Prompts,
    /// One resource, one tool and one prompt
    Full,
    /// Persistent task manager
    Tasks,
}

/// Formats a number without a trailing `.0` when it is integral
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Builds the selected server and serves it on stdio until the client disconnects
pub async fn serve(kind: ServerKind, config: &ConfigLoader, data_file: PathBuf) -> Result<()> {
    match kind {
        ServerKind::Hello => run(HelloServer).await,
        ServerKind::Library => run(CatalogServer::books(config.books().to_vec())).await,
        ServerKind::Media => run(CatalogServer::media(config.media().to_vec())).await,
        ServerKind::Calculator => run(CalculatorServer).await,
        ServerKind::Weather => run(WeatherServer::new(config.weather().to_vec())).await,
        ServerKind::MultiTool => run(MultiToolServer::new(config.weather().to_vec())).await,
        ServerKind::Prompts => run(PromptTemplateServer).await,
        ServerKind::Full => run(FullFeaturedServer).await,
        ServerKind::Tasks => {
            info!("Task data file: {}", data_file.display());
            let storage = TaskStorage::open(data_file.clone())
                .await
                .with_context(|| format!("Failed to load tasks from {}", data_file.display()))?;
            run(TaskManagerServer::new(Arc::new(storage))).await
        }
    }
}

async fn run<S: McpService + 'static>(service: S) -> Result<()> {
    let server = McpServer::new(Arc::new(service));
    server.run().await?;
    info!("MCP server stopped normally");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(10.0 / 3.0), "3.3333333333333335");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_server_kind_names() {
        let kind = ServerKind::from_str("multi-tool", false).unwrap();
        assert_eq!(kind, ServerKind::MultiTool);
        assert!(ServerKind::from_str("nope", false).is_err());
    }
}
