//! Task model and its JSON-file storage

pub mod storage;
pub mod types;

pub use storage::TaskStorage;
pub use types::{
    Priority, Task, TaskCreateInput, TaskFilter, TaskStatus, TaskSummary, TaskUpdateInput,
};
