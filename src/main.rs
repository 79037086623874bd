use anyhow::Result;
use clap::{Parser, Subcommand};
use mcp_handson::demo::{self, DemoKind, ServerCommand};
use mcp_handson::{ConfigLoader, ServerKind, TaskStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Example Model Context Protocol servers, clients and demos
///
/// Servers speak JSON-RPC on stdin/stdout; all logging goes to stderr.
#[derive(Parser, Debug)]
#[command(name = "mcp-handson")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    ///
    /// Defaults to the config file's `log_level`, then `info`.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log to file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// JSON file the task manager keeps its tasks in
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one of the example MCP servers on stdio
    Serve {
        #[arg(value_enum)]
        server: ServerKind,
    },
    /// Run the task API as a REST service
    Rest {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Spawn an example server and walk through it as an MCP client
    Demo {
        #[arg(value_enum)]
        demo: DemoKind,
    },
    /// Walk through a running REST server as an HTTP client
    RestDemo {
        /// Where the REST server is listening
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn setup_logging(log_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(log_path)?;
        subscriber.with_writer(file).with_ansi(false).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match ConfigLoader::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let log_level = args
        .log_level
        .clone()
        .or_else(|| config.log_level().map(str::to_string))
        .unwrap_or_else(|| "info".to_string());
    setup_logging(&log_level, args.log_file)?;

    info!("Starting mcp-handson v{}", env!("CARGO_PKG_VERSION"));
    if let Some(source) = config.source() {
        info!("Using config file: {}", source.display());
    }

    let data_file = args.data_file.unwrap_or_else(|| config.data_file());

    match args.command {
        Command::Serve { server } => {
            mcp_handson::servers::serve(server, &config, data_file).await?;
        }
        Command::Rest { port } => {
            let port = port.unwrap_or_else(|| config.rest_port());
            info!("Task data file: {}", data_file.display());
            let storage = TaskStorage::open(data_file).await?;
            mcp_handson::rest::serve(Arc::new(storage), port).await?;
        }
        Command::Demo { demo } => {
            let command = ServerCommand::current_exe(data_file)?;
            demo::run(demo, &command).await?;
        }
        Command::RestDemo { base_url } => {
            let base_url =
                base_url.unwrap_or_else(|| format!("http://localhost:{}", config.rest_port()));
            demo::rest_demo(&base_url).await?;
        }
    }

    Ok(())
}
