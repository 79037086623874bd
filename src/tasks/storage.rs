//! JSON-file backed task storage
//!
//! The whole list lives in memory and is rewritten to disk after every
//! mutation. Memory only changes once the write has succeeded. Lookups are
//! linear scans.

use crate::tasks::types::{Task, TaskCreateInput, TaskFilter, TaskStatus, TaskSummary, TaskUpdateInput};
use crate::types::{HandsOnError, Result};
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub struct TaskStorage {
    path: PathBuf,
    tasks: RwLock<Vec<Task>>,
}

impl TaskStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Create a storage and load it from disk
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self::new(path);
        storage.load().await?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load tasks from the data file; a missing file means an empty list
    pub async fn load(&self) -> Result<()> {
        let loaded = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str::<Vec<Task>>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No data file at {}, starting empty", self.path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} task(s) from {}", loaded.len(), self.path.display());
        *self.tasks.write().await = loaded;
        Ok(())
    }

    pub async fn save(&self) -> Result<()> {
        let tasks = self.tasks.read().await;
        self.write_file(&tasks).await
    }

    async fn write_file(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved {} task(s) to {}", tasks.len(), self.path.display());
        Ok(())
    }

    pub async fn get_all(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn create(&self, input: TaskCreateInput) -> Result<Task> {
        let now = timestamp();
        let task = Task {
            id: generate_id(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            status: TaskStatus::Todo,
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
            created_at: now.clone(),
            updated_at: now,
            tags: input.tags.unwrap_or_default(),
        };

        let mut tasks = self.tasks.write().await;
        let mut next = tasks.clone();
        next.push(task.clone());
        self.write_file(&next).await?;
        *tasks = next;

        info!("Created task {}", task.id);
        Ok(task)
    }

    pub async fn update(&self, input: TaskUpdateInput) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| t.id == input.id)
            .ok_or_else(|| HandsOnError::TaskNotFound(input.id.clone()))?;

        let mut updated = tasks[index].clone();
        input.apply_to(&mut updated);
        updated.updated_at = timestamp();

        let mut next = tasks.clone();
        next[index] = updated.clone();
        self.write_file(&next).await?;
        *tasks = next;

        info!("Updated task {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| HandsOnError::TaskNotFound(id.to_string()))?;

        let mut next = tasks.clone();
        let removed = next.remove(index);
        self.write_file(&next).await?;
        *tasks = next;

        info!("Deleted task {}", id);
        Ok(removed)
    }

    pub async fn search(&self, filter: &TaskFilter) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    pub async fn summary(&self) -> TaskSummary {
        TaskSummary::from_tasks(&self.tasks.read().await)
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `task_<unix millis>_<9 lowercase alphanumerics>`
fn generate_id() -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("task_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::types::Priority;
    use tempfile::TempDir;

    fn input(title: &str) -> TaskCreateInput {
        TaskCreateInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    async fn storage(dir: &TempDir) -> TaskStorage {
        TaskStorage::open(dir.path().join("tasks.json")).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        assert!(storage.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ nope").unwrap();

        let result = TaskStorage::open(&path).await;
        assert!(matches!(result, Err(HandsOnError::Json(_))));
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_persists() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let task = storage.create(input("Learn MCP")).await.unwrap();
        assert!(task.id.starts_with("task_"));
        assert_eq!(task.id.rsplit('_').next().unwrap().len(), 9);
        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert_eq!(task.created_at, task.updated_at);

        let reloaded = TaskStorage::open(storage.path()).await.unwrap();
        assert_eq!(reloaded.get_all().await, vec![task]);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        storage.create(input("a")).await.unwrap();

        let content = std::fs::read_to_string(storage.path()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"id\""));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let task = storage.create(input("Draft")).await.unwrap();

        let updated = storage
            .update(TaskUpdateInput {
                id: task.id.clone(),
                status: Some(TaskStatus::Done),
                tags: Some(vec!["done".into()]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.tags, vec!["done".to_string()]);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(storage.get_by_id(&task.id).await, Some(updated));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let err = storage
            .update(TaskUpdateInput {
                id: "missing".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HandsOnError::TaskNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let a = storage.create(input("a")).await.unwrap();
        let b = storage.create(input("b")).await.unwrap();

        storage.delete(&a.id).await.unwrap();
        assert_eq!(storage.get_all().await, vec![b]);
        assert!(storage.delete(&a.id).await.is_err());
    }

    #[tokio::test]
    async fn test_search_and_summary() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        storage
            .create(TaskCreateInput {
                title: "Finish hands-on".into(),
                priority: Some(Priority::High),
                tags: Some(vec!["MCP".into()]),
                ..Default::default()
            })
            .await
            .unwrap();
        let other = storage.create(input("Build sample app")).await.unwrap();
        storage
            .update(TaskUpdateInput {
                id: other.id,
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            })
            .await
            .unwrap();

        let high = storage
            .search(&TaskFilter {
                priority: Some(Priority::High),
                ..Default::default()
            })
            .await;
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].title, "Finish hands-on");

        let summary = storage.summary().await;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.todo, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.high_priority, 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_tasks_unchanged() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir(&data_dir).unwrap();
        let storage = TaskStorage::open(data_dir.join("tasks.json")).await.unwrap();
        let task = storage.create(input("Keep me")).await.unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();

        assert!(storage.create(input("Lost")).await.is_err());
        assert!(storage
            .update(TaskUpdateInput {
                id: task.id.clone(),
                title: Some("Renamed".into()),
                ..Default::default()
            })
            .await
            .is_err());
        assert!(storage.delete(&task.id).await.is_err());

        assert_eq!(storage.get_all().await, vec![task]);
    }
}
