//! Durable, authoritative task collection.

pub mod cache;
pub mod error;

pub use cache::TaskListCache;
pub use error::StoreError;

use crate::domain::{NewTask, TaskId, TaskRecord};
use crate::persistence::BlobStore;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<TaskRecord>,
    revision: u64,
}

/// Keyed task collection persisted as one blob.
///
/// Every mutation holds the store mutex and the backend's key lock for its
/// whole read-modify-write cycle: it loads the latest durable collection,
/// applies its change to that copy, writes the full collection back and only
/// then publishes it in memory. Overlapping mutations queue on the locks, so at
/// most one is in flight per key, across store instances and processes.
pub struct TaskStore<B> {
    backend: B,
    key: String,
    state: Mutex<StoreState>,
}

impl<B: BlobStore> TaskStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Create a store and load its durable state
    pub fn open(backend: B, key: impl Into<String>) -> Result<Self, StoreError> {
        let store = Self::new(backend, key);
        store.read()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // State is only replaced after a confirmed write, so a poisoned lock still guards consistent data
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tasks in creation order
    pub fn list(&self) -> Vec<TaskRecord> {
        self.lock().tasks.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<TaskRecord> {
        self.lock().tasks.iter().find(|task| task.id == id).cloned()
    }

    /// Counter bumped by every reload and successful mutation
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Reload durable state into memory, seeding an empty collection when nothing is stored yet
    pub fn read(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let mut state = self.lock();
        let _guard = self.lock_durable()?;

        let tasks = match self.load_durable()? {
            Some(tasks) => tasks,
            None => {
                tracing::warn!(key = %self.key, "no stored tasks, seeding an empty collection");
                self.write_durable(&[])?;
                Vec::new()
            }
        };

        tracing::debug!(key = %self.key, count = tasks.len(), "loaded tasks");
        state.tasks = tasks.clone();
        state.revision += 1;
        Ok(tasks)
    }

    /// Append a new task with a fresh id
    pub fn create(&self, task: NewTask) -> Result<TaskRecord, StoreError> {
        let record = self.mutate(|tasks| {
            let mut id = TaskId::new();
            while tasks.iter().any(|existing| existing.id == id) {
                id = TaskId::new();
            }
            let record = task.into_record(id);
            tasks.push(record.clone());
            Ok(record)
        })?;

        tracing::info!(task_id = %record.id, name = %record.name, "created task");
        Ok(record)
    }

    /// Replace the task with `id` in place, keeping its position and id
    pub fn update(&self, id: TaskId, task: NewTask) -> Result<TaskRecord, StoreError> {
        let record = self.mutate(|tasks| {
            let slot = tasks
                .iter_mut()
                .find(|existing| existing.id == id)
                .ok_or(StoreError::NotFound(id))?;
            *slot = task.into_record(id);
            Ok(slot.clone())
        })?;

        tracing::info!(task_id = %id, "updated task");
        Ok(record)
    }

    /// Remove the task with `id`, returning it
    pub fn delete(&self, id: TaskId) -> Result<TaskRecord, StoreError> {
        let removed = self.mutate(|tasks| {
            let index = tasks
                .iter()
                .position(|existing| existing.id == id)
                .ok_or(StoreError::NotFound(id))?;
            Ok(tasks.remove(index))
        })?;

        tracing::info!(task_id = %id, "deleted task");
        Ok(removed)
    }

    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Vec<TaskRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.lock();
        let _guard = self.lock_durable()?;

        let mut tasks = self.load_durable()?.unwrap_or_default();
        let result = apply(&mut tasks)?;
        self.write_durable(&tasks)?;

        state.tasks = tasks;
        state.revision += 1;
        Ok(result)
    }

    fn lock_durable(&self) -> Result<B::Guard, StoreError> {
        self.backend.lock(&self.key).map_err(StoreError::Storage)
    }

    fn load_durable(&self) -> Result<Option<Vec<TaskRecord>>, StoreError> {
        let raw = self.backend.get(&self.key).map_err(StoreError::Storage)?;
        let Some(raw) = raw.filter(|text| !text.trim().is_empty()) else {
            return Ok(None);
        };

        let tasks: Vec<TaskRecord> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id) {
                return Err(StoreError::Corrupt(format!("duplicate task id {}", task.id)));
            }
            if !task.is_well_formed() {
                return Err(StoreError::Corrupt(format!("task {} is missing required fields", task.id)));
            }
        }

        Ok(Some(tasks))
    }

    fn write_durable(&self, tasks: &[TaskRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(tasks)?;
        self.backend
            .put(&self.key, &json)
            .map_err(StoreError::Storage)
    }
}
