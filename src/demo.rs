//! Walkthroughs that drive the example servers the way a client would
//!
//! The MCP demos spawn this same binary in `serve` mode and talk to it over
//! stdio. The REST demo calls a running `rest` server over HTTP.

use crate::mcp::protocol::{GetPromptResult, ToolContent};
use crate::mcp::McpClient;
use crate::tasks::Task;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use serde_json::{json, Map};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Calculator and weather tools on the multi-tool server
    Basic,
    /// Create, summarize and report on tasks
    Tasks,
}

/// How to launch a server process for the MCP demos
#[derive(Debug, Clone)]
pub struct ServerCommand {
    pub program: PathBuf,
    pub data_file: PathBuf,
}

impl ServerCommand {
    /// Re-run the current executable
    pub fn current_exe(data_file: PathBuf) -> Result<Self> {
        let program = std::env::current_exe().context("Cannot locate the running executable")?;
        Ok(Self { program, data_file })
    }

    async fn connect(&self, server: &str) -> Result<McpClient> {
        let data_file = self.data_file.to_string_lossy().into_owned();
        let args = ["--log-level", "warn", "--data-file", &data_file, "serve", server];
        let client = McpClient::spawn(&self.program, args)
            .await
            .with_context(|| format!("Failed to start the {} server", server))?;
        Ok(client)
    }
}

pub async fn run(kind: DemoKind, command: &ServerCommand) -> Result<()> {
    match kind {
        DemoKind::Basic => basic(command).await,
        DemoKind::Tasks => tasks(command).await,
    }
}

async fn basic(command: &ServerCommand) -> Result<()> {
    println!("🔌 Starting MCP client\n");
    let client = command.connect("multi-tool").await?;
    println!("✅ Connected to {}\n", client.server_info().name);

    println!("[Step 1] List the available tools");
    let tools = client.list_tools().await?;
    println!("Found {} tool(s)", tools.len());
    for tool in &tools {
        println!("  - {}: {}", tool.name, tool.description);
    }

    println!("\n[Step 2] Run the calculator");
    let calc = client
        .call_tool("calculate", json!({"operation": "add", "a": 10, "b": 20}))
        .await?;
    println!("  {}", calc.joined_text());

    println!("\n[Step 3] Get the weather");
    let weather = client
        .call_tool("get_weather", json!({"city": "Tokyo"}))
        .await?;
    println!("  {}", weather.joined_text());

    println!("\n✨ Demo complete!");
    client.close().await?;
    Ok(())
}

async fn tasks(command: &ServerCommand) -> Result<()> {
    println!("📋 Task manager client\n");
    let client = command.connect("tasks").await?;
    println!("✅ Connected to {}\n", client.server_info().name);

    println!("[1] Create tasks");
    for args in [
        json!({
            "title": "Finish the MCP hands-on",
            "description": "Work through every chapter and exercise",
            "priority": "high",
            "tags": ["learning", "MCP"]
        }),
        json!({
            "title": "Build a sample app",
            "description": "Develop a practical app on top of MCP",
            "priority": "medium",
            "tags": ["development", "MCP"]
        }),
    ] {
        let result = client.call_tool("create_task", args).await?;
        if result.is_error == Some(true) {
            bail!("create_task failed: {}", result.joined_text());
        }
    }
    println!("  ✅ Created 2 tasks\n");

    println!("[2] Read the task summary");
    let summary = client.read_resource("tasks://summary").await?;
    for contents in &summary.contents {
        println!("{}", contents.text);
    }
    println!();

    println!("[3] Search high-priority tasks");
    let found = client
        .call_tool("search_tasks", json!({"priority": "high"}))
        .await?;
    println!("{}\n", found.joined_text());

    println!("[4] Get the weekly report prompt");
    let prompt = client.get_prompt("weekly_report", Map::new()).await?;
    println!("Prompt:\n{}\n", prompt_text(&prompt));

    println!("✨ Demo complete!");
    client.close().await?;
    Ok(())
}

fn prompt_text(prompt: &GetPromptResult) -> String {
    prompt
        .messages
        .iter()
        .map(|m| match &m.content {
            ToolContent::Text { text } => text.as_str(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Deserialize)]
struct TaskListBody {
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct TaskBody {
    task: Task,
}

/// Client side of the REST comparison
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        let body: TaskListBody = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .send()
            .await?
            .error_for_status()
            .context("Failed to fetch tasks")?
            .json()
            .await?;
        Ok(body.tasks)
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<Task> {
        let body: TaskBody = self
            .http
            .post(format!("{}/tasks", self.base_url))
            .json(&json!({"title": title, "description": description}))
            .send()
            .await?
            .error_for_status()
            .context("Failed to create task")?
            .json()
            .await?;
        Ok(body.task)
    }

    pub async fn set_status(&self, id: &str, status: &str) -> Result<Task> {
        let body: TaskBody = self
            .http
            .put(format!("{}/tasks/{}", self.base_url, id))
            .json(&json!({"status": status}))
            .send()
            .await?
            .error_for_status()
            .context("Failed to update task")?
            .json()
            .await?;
        Ok(body.task)
    }
}

pub async fn rest_demo(base_url: &str) -> Result<()> {
    info!("Calling REST API at {}", base_url);
    let client = RestClient::new(base_url);
    println!("🔧 REST API client demo\n");

    println!("1️⃣ Fetch the task list...");
    let tasks = client.list().await?;
    println!("   Got {} task(s)", tasks.len());
    for task in &tasks {
        println!("   - [{}] {}", task.status, task.title);
    }

    println!("\n2️⃣ Create a new task...");
    let task = client
        .create("Read chapter 1", "Understand the basic MCP concepts")
        .await?;
    println!("   Created: {} (ID: {})", task.title, task.id);

    println!("\n3️⃣ Update the task...");
    let task = client.set_status(&task.id, "in-progress").await?;
    println!("   Updated: {} -> {}", task.title, task.status);

    println!("\n✅ Demo complete");
    Ok(())
}
