use crate::domain::TaskId;
use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No task with this id exists.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// The durable backend could not be read or written.
    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),

    /// The stored collection could not be decoded.
    #[error("Stored task data is corrupt: {0}")]
    Corrupt(String),

    /// Failed to serialize the collection.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}
