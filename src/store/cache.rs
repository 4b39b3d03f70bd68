//! Read-only projection of the task store for rendering.

use super::{StoreError, TaskStore};
use crate::domain::{TaskId, TaskRecord};
use crate::persistence::BlobStore;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Snapshot handed to subscribers after each refresh
pub type TaskList = Arc<[TaskRecord]>;

/// Cached task list in store order, with an id index.
///
/// Never written to directly: it only changes through [`refresh`](Self::refresh),
/// which callers run after each confirmed store mutation.
#[derive(Debug, Default)]
pub struct TaskListCache {
    tasks: Vec<TaskRecord>,
    task_index: HashMap<TaskId, usize>,
    revision: Option<u64>,
    subscribers: Vec<Sender<TaskList>>,
}

impl TaskListCache {
    /// Build a cache already in sync with `store`
    pub fn load<B: BlobStore>(store: &TaskStore<B>) -> Self {
        let mut cache = Self::default();
        cache.refresh(store);
        cache
    }

    /// Pull the current list from the store and publish it to subscribers
    pub fn refresh<B: BlobStore>(&mut self, store: &TaskStore<B>) {
        // Revision first: a mutation landing in between makes us stale, not falsely fresh
        self.revision = Some(store.revision());
        self.tasks = store.list();
        self.rebuild_index();
        tracing::debug!(count = self.tasks.len(), "refreshed task list cache");
        self.publish();
    }

    /// True when the store changed since the last refresh
    pub fn is_stale<B: BlobStore>(&self, store: &TaskStore<B>) -> bool {
        self.revision != Some(store.revision())
    }

    fn rebuild_index(&mut self) {
        self.task_index = self
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| (task.id, idx))
            .collect();
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot: TaskList = self.tasks.clone().into();
        self.subscribers
            .retain(|subscriber| subscriber.send(Arc::clone(&snapshot)).is_ok());
    }

    /// Receive every refreshed list from now on; dropped receivers are pruned on the next refresh
    pub fn subscribe(&mut self) -> Receiver<TaskList> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Tasks in store order
    pub fn list(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Position of the task with `id`, searched by identity
    pub fn find_index_by_id(&self, id: TaskId) -> Result<usize, StoreError> {
        self.task_index
            .get(&id)
            .copied()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.task_index.get(&id).and_then(|&idx| self.tasks.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::datetime::TIMESTAMP_FORMAT;
    use crate::domain::{Location, NewTask, Priority, Status};
    use crate::persistence::blob::memory::MemoryBlobStore;
    use chrono::NaiveDateTime;

    fn task(name: &str) -> NewTask {
        NewTask {
            name: name.to_string(),
            description: "desc".to_string(),
            status: Status::Pending,
            priority: Priority::Medium,
            start_date: NaiveDateTime::parse_from_str("2024-03-01T08:00:00", TIMESTAMP_FORMAT).unwrap(),
            due_date: NaiveDateTime::parse_from_str("2024-03-01T18:00:00", TIMESTAMP_FORMAT).unwrap(),
            location: Location {
                latitude: 0.0,
                longitude: 0.0,
            },
        }
    }

    fn store() -> TaskStore<MemoryBlobStore> {
        TaskStore::open(MemoryBlobStore::default(), "tasks").unwrap()
    }

    #[test]
    fn test_load_mirrors_store_order() {
        let store = store();
        let a = store.create(task("A")).unwrap();
        let b = store.create(task("B")).unwrap();

        let cache = TaskListCache::load(&store);

        assert_eq!(cache.list(), store.list().as_slice());
        assert_eq!(cache.find_index_by_id(a.id).unwrap(), 0);
        assert_eq!(cache.find_index_by_id(b.id).unwrap(), 1);
        assert!(!cache.is_stale(&store));
    }

    #[test]
    fn test_cache_is_stale_until_refreshed() {
        let store = store();
        let mut cache = TaskListCache::load(&store);

        let created = store.create(task("A")).unwrap();
        assert!(cache.is_stale(&store));
        assert!(cache.list().is_empty());

        cache.refresh(&store);
        assert!(!cache.is_stale(&store));
        assert_eq!(cache.list().len(), 1);
        assert_eq!(cache.get(created.id), Some(&created));
    }

    #[test]
    fn test_find_index_after_delete_shifts_by_identity() {
        let store = store();
        let a = store.create(task("A")).unwrap();
        store.create(task("B")).unwrap();
        let c = store.create(task("C")).unwrap();
        let mut cache = TaskListCache::load(&store);

        store.delete(a.id).unwrap();
        cache.refresh(&store);

        assert_eq!(cache.find_index_by_id(c.id).unwrap(), 1);
        assert!(matches!(cache.find_index_by_id(a.id), Err(StoreError::NotFound(id)) if id == a.id));
    }

    #[test]
    fn test_failed_mutation_does_not_make_cache_stale() {
        let store = store();
        store.create(task("A")).unwrap();
        let cache = TaskListCache::load(&store);

        store.backend().fail_writes(true);
        assert!(store.create(task("B")).is_err());

        assert!(!cache.is_stale(&store));
        assert_eq!(cache.list().len(), 1);
    }

    #[test]
    fn test_subscribers_receive_refreshed_lists() {
        let store = store();
        let mut cache = TaskListCache::load(&store);
        let rx = cache.subscribe();
        let dropped = cache.subscribe();
        drop(dropped);

        store.create(task("A")).unwrap();
        cache.refresh(&store);

        let published = rx.try_recv().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].name, "A");
        assert_eq!(cache.subscribers.len(), 1);
    }
}
