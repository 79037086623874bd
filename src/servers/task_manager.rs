//! Task manager server
//!
//! Combines everything: tasks are readable as resources, editable through
//! tools, and feed two prompts. All state lives in [`TaskStorage`].

use crate::mcp::protocol::{
    CallToolResult, GetPromptResult, Prompt, PromptArgument, ReadResourceResult, Resource,
    ServerCapabilities, ServerInfo, Tool,
};
use crate::mcp::service::{capabilities, into_tool_result, parse_args, prompt_arg, unknown_tool, McpService};
use crate::tasks::{Task, TaskCreateInput, TaskFilter, TaskStorage, TaskSummary, TaskUpdateInput};
use crate::types::{HandsOnError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

const ALL_URI: &str = "tasks://all";
const SUMMARY_URI: &str = "tasks://summary";
const ITEM_PREFIX: &str = "tasks://item/";
const JSON: &str = "application/json";

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    id: String,
}

pub struct TaskManagerServer {
    storage: Arc<TaskStorage>,
}

impl TaskManagerServer {
    pub fn new(storage: Arc<TaskStorage>) -> Self {
        Self { storage }
    }

    async fn create_task(&self, input: TaskCreateInput) -> Result<String> {
        if input.title.trim().is_empty() {
            return Err(HandsOnError::InvalidArguments("title is required".to_string()));
        }
        let task = self.storage.create(input).await?;
        Ok(format!("✅ Created task\nID: {}\nTitle: {}", task.id, task.title))
    }

    async fn update_task(&self, input: TaskUpdateInput) -> Result<String> {
        if input.id.is_empty() {
            return Err(HandsOnError::InvalidArguments("id is required".to_string()));
        }
        let task = self.storage.update(input).await?;
        Ok(format!("✅ Updated task\n{} [{}]", task.title, task.status))
    }

    async fn delete_task(&self, args: DeleteArgs) -> Result<String> {
        self.storage.delete(&args.id).await?;
        Ok(format!("🗑️ Deleted task (ID: {})", args.id))
    }

    async fn search_tasks(&self, filter: TaskFilter) -> Result<String> {
        let tasks = self.storage.search(&filter).await;
        if tasks.is_empty() {
            return Ok("No matching tasks".to_string());
        }

        let lines = tasks
            .iter()
            .map(|t| format!("- [{}] {} (priority: {})", t.status, t.title, t.priority))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("🔍 Found {} task(s):\n\n{}", tasks.len(), lines))
    }
}

pub fn format_summary(summary: &TaskSummary) -> String {
    format!(
        "📊 Task Manager Summary\n\n\
         Total tasks: {}\n  \
         📝 To do: {}\n  \
         🔄 In progress: {}\n  \
         ✅ Done: {}\n  \
         🔥 High priority: {}",
        summary.total, summary.todo, summary.in_progress, summary.done, summary.high_priority
    )
}

fn item_resource(task: &Task) -> Resource {
    Resource {
        uri: format!("{}{}", ITEM_PREFIX, task.id),
        name: task.title.clone(),
        description: Some(format!("[{}] {}", task.status, task.title)),
        mime_type: Some(JSON.to_string()),
    }
}

fn string_prop(description: &str) -> Value {
    serde_json::json!({ "type": "string", "description": description })
}

fn status_prop() -> Value {
    serde_json::json!({ "type": "string", "enum": ["todo", "in-progress", "done"] })
}

fn priority_prop() -> Value {
    serde_json::json!({ "type": "string", "enum": ["low", "medium", "high"] })
}

fn tags_prop() -> Value {
    serde_json::json!({ "type": "array", "items": { "type": "string" }, "description": "List of tags" })
}

#[async_trait]
impl McpService for TaskManagerServer {
    fn info(&self) -> ServerInfo {
        ServerInfo::new("task-manager-server", "1.0.0")
    }

    fn capabilities(&self) -> ServerCapabilities {
        capabilities(true, true, true)
    }

    async fn resources(&self) -> Result<Vec<Resource>> {
        let mut resources = vec![
            Resource {
                uri: ALL_URI.to_string(),
                name: "All tasks".to_string(),
                description: Some("Every task as JSON".to_string()),
                mime_type: Some(JSON.to_string()),
            },
            Resource {
                uri: SUMMARY_URI.to_string(),
                name: "Task summary".to_string(),
                description: Some("Task statistics".to_string()),
                mime_type: Some("text/plain".to_string()),
            },
        ];
        resources.extend(self.storage.get_all().await.iter().map(item_resource));
        Ok(resources)
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        if uri == ALL_URI {
            let text = serde_json::to_string_pretty(&self.storage.get_all().await)?;
            return Ok(ReadResourceResult::single(uri, JSON, text));
        }

        if uri == SUMMARY_URI {
            let text = format_summary(&self.storage.summary().await);
            return Ok(ReadResourceResult::single(uri, "text/plain", text));
        }

        if let Some(id) = uri.strip_prefix(ITEM_PREFIX).filter(|id| !id.is_empty()) {
            let task = self
                .storage
                .get_by_id(id)
                .await
                .ok_or_else(|| HandsOnError::TaskNotFound(id.to_string()))?;
            let text = serde_json::to_string_pretty(&task)?;
            return Ok(ReadResourceResult::single(uri, JSON, text));
        }

        Err(HandsOnError::UnknownResource(uri.to_string()))
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "create_task".to_string(),
                description: "Create a new task".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "title": string_prop("Task title"),
                        "description": string_prop("Task description"),
                        "priority": priority_prop(),
                        "dueDate": string_prop("Due date (ISO 8601)"),
                        "tags": tags_prop()
                    },
                    "required": ["title"]
                }),
            },
            Tool {
                name: "update_task".to_string(),
                description: "Update a task".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": string_prop("Task ID"),
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "status": status_prop(),
                        "priority": priority_prop(),
                        "dueDate": string_prop("Due date (ISO 8601)"),
                        "tags": tags_prop()
                    },
                    "required": ["id"]
                }),
            },
            Tool {
                name: "delete_task".to_string(),
                description: "Delete a task".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": string_prop("Task ID")
                    },
                    "required": ["id"]
                }),
            },
            Tool {
                name: "search_tasks".to_string(),
                description: "Search tasks".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "status": status_prop(),
                        "priority": priority_prop(),
                        "tag": { "type": "string" },
                        "searchText": string_prop("Text to look for in title or description")
                    }
                }),
            },
        ]
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let outcome = match name {
            "create_task" => match parse_args::<TaskCreateInput>(arguments) {
                Ok(input) => self.create_task(input).await,
                Err(e) => Err(e),
            },
            "update_task" => match parse_args::<TaskUpdateInput>(arguments) {
                Ok(input) => self.update_task(input).await,
                Err(e) => Err(e),
            },
            "delete_task" => match parse_args::<DeleteArgs>(arguments) {
                Ok(args) => self.delete_task(args).await,
                Err(e) => Err(e),
            },
            "search_tasks" => match parse_args::<TaskFilter>(arguments) {
                Ok(filter) => self.search_tasks(filter).await,
                Err(e) => Err(e),
            },
            _ => return unknown_tool(name),
        };
        into_tool_result(name, outcome)
    }

    fn prompts(&self) -> Vec<Prompt> {
        vec![
            Prompt {
                name: "create_task_prompt".to_string(),
                description: Some("Help with creating tasks".to_string()),
                arguments: vec![PromptArgument::new("topic", "Topic of the tasks", true)],
            },
            Prompt {
                name: "weekly_report".to_string(),
                description: Some("Write a weekly report".to_string()),
                arguments: vec![],
            },
        ]
    }

    async fn get_prompt(&self, name: &str, arguments: &Map<String, Value>) -> Result<GetPromptResult> {
        match name {
            "create_task_prompt" => {
                let topic = prompt_arg(arguments, "topic", "project");
                Ok(GetPromptResult::user(format!(
                    "Create tasks related to \"{}\".\n\n\
                     Include the following:\n\
                     1. A clear title\n\
                     2. A concrete description\n\
                     3. An appropriate priority\n\
                     4. Relevant tags",
                    topic
                )))
            }
            "weekly_report" => {
                let summary = self.storage.summary().await;
                Ok(GetPromptResult::user(format!(
                    "Please write this week's task management report.\n\n\
                     Current status:\n\
                     - Total tasks: {}\n\
                     - Completed tasks: {}\n\
                     - Completion rate: {:.1}%\n\n\
                     Include the following in the report:\n\
                     1. This week's accomplishments\n\
                     2. Status of unfinished tasks\n\
                     3. Plan for next week",
                    summary.total,
                    summary.done,
                    summary.completion_rate()
                )))
            }
            _ => Err(HandsOnError::UnknownPrompt(name.to_string())),
        }
    }
}
