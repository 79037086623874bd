//! Task model shared by the MCP task manager and the REST API

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateInput {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update; only the fields that are present are applied
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    #[serde(default)]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TaskUpdateInput {
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
    pub search_text: Option<String>,
}

impl TaskFilter {
    /// All present criteria must hold
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !task.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(text) = &self.search_text {
            let needle = text.to_lowercase();
            if !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub high_priority: usize,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut summary = TaskSummary {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Todo => summary.todo += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::Done => summary.done += 1,
            }
            if task.priority == Priority::High {
                summary.high_priority += 1;
            }
        }
        summary
    }

    /// Share of done tasks in percent; 0 for an empty list
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, description: &str, tags: &[&str]) -> Task {
        Task {
            id: "task_1".into(),
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_wire_names() {
        let mut t = task("Learn MCP", "", &[]);
        t.status = TaskStatus::InProgress;
        t.due_date = Some("2024-12-31".into());
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["dueDate"], "2024-12-31");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_filter_search_text_is_case_insensitive() {
        let t = task("Write Docs", "Explain the RESOURCE model", &[]);
        let filter = TaskFilter {
            search_text: Some("resource".into()),
            ..Default::default()
        };
        assert!(filter.matches(&t));

        let filter = TaskFilter {
            search_text: Some("docs".into()),
            ..Default::default()
        };
        assert!(filter.matches(&t));
    }

    #[test]
    fn test_filter_tag_is_exact() {
        let t = task("a", "b", &["MCP"]);
        let filter = TaskFilter {
            tag: Some("mcp".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&t));
    }

    #[test]
    fn test_filter_combines_criteria() {
        let t = task("a", "b", &["x"]);
        let filter = TaskFilter {
            tag: Some("x".into()),
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert!(!filter.matches(&t));
    }

    #[test]
    fn test_completion_rate_empty() {
        assert_eq!(TaskSummary::default().completion_rate(), 0.0);
    }
}
