//! Registry of outstanding fetch tasks.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::domain::CancelFlag;
use crate::domain::entities::{FetchStatus, ResourceKey};

/// Identity of one fetch task. Never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// One in-flight fetch.
#[derive(Debug)]
pub struct FetchTask {
    id: TaskId,
    key: ResourceKey,
    cancel: CancelFlag,
    status: FetchStatus,
    started_at: Instant,
}

impl FetchTask {
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub const fn key(&self) -> &ResourceKey {
        &self.key
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Tracks fetch tasks by identity.
///
/// Keyed by [`TaskId`] rather than resource key: after a cancel a new task
/// for the same key may start while the old one is still winding down.
/// A second index maps each key to its one running task.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, FetchTask>,
    running: HashMap<ResourceKey, TaskId>,
    next_id: u64,
}

impl TaskRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a running task for `key` and spawns `work` on the runtime.
    ///
    /// `work` receives the task id, the key and the task's cancel flag.
    /// Returns without waiting for the work to make progress. A task
    /// already running for `key` is cancelled first, so a key never has
    /// two running tasks.
    pub fn start<F, Fut>(&mut self, key: ResourceKey, work: F) -> TaskId
    where
        F: FnOnce(TaskId, ResourceKey, CancelFlag) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.running.remove(&key) {
            self.mark_cancelled(previous);
            debug!(task = %previous, key = %key, "Superseded running fetch task");
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let cancel = CancelFlag::new();
        tokio::spawn(work(id, key.clone(), cancel.clone()));

        debug!(task = %id, key = %key, "Started fetch task");
        self.running.insert(key.clone(), id);
        self.tasks.insert(
            id,
            FetchTask {
                id,
                key,
                cancel,
                status: FetchStatus::Running,
                started_at: Instant::now(),
            },
        );
        id
    }

    /// Signals every running task to stop. Does not wait for them.
    /// Returns how many tasks were newly cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let running: Vec<TaskId> = self.running.drain().map(|(_, id)| id).collect();
        for id in &running {
            self.mark_cancelled(*id);
        }
        if !running.is_empty() {
            debug!(count = running.len(), "Cancelled all running fetch tasks");
        }
        running.len()
    }

    fn mark_cancelled(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(&id) {
            task.cancel.cancel();
            task.status = FetchStatus::Cancelled;
        }
    }

    /// Unregisters a task. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: TaskId) -> Option<FetchTask> {
        let mut task = self.tasks.remove(&id)?;
        if task.status.is_running() {
            task.status = FetchStatus::Completed;
            self.running.remove(&task.key);
        }
        trace!(
            task = %id,
            key = %task.key,
            status = %task.status,
            elapsed_ms = task.elapsed().as_millis(),
            "Removed fetch task"
        );
        Some(task)
    }

    /// Returns true if a task for `key` is registered and not cancelled.
    #[must_use]
    pub fn is_running(&self, key: &ResourceKey) -> bool {
        self.running.contains_key(key)
    }

    /// Returns true if `id` is registered and has not been cancelled.
    /// Results from tasks that are not live must be discarded.
    #[must_use]
    pub fn is_live(&self, id: TaskId) -> bool {
        self.tasks
            .get(&id)
            .is_some_and(|task| task.status.is_running())
    }

    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&FetchTask> {
        self.tasks.get(&id)
    }

    /// Number of registered tasks, cancelled ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Id of the running task for `key`, if any.
    #[must_use]
    pub fn running_task(&self, key: &ResourceKey) -> Option<TaskId> {
        self.running.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn key(s: &str) -> ResourceKey {
        ResourceKey::new(s)
    }

    #[tokio::test]
    async fn test_start_registers_running_task() {
        let mut registry = TaskRegistry::new();
        let id = registry.start(key("a"), |_, _, _| async {});

        assert!(registry.is_live(id));
        assert!(registry.is_running(&key("a")));
        assert!(!registry.is_running(&key("b")));
        assert_eq!(registry.get(id).unwrap().key(), &key("a"));
    }

    #[tokio::test]
    async fn test_start_passes_identity_to_work() {
        let mut registry = TaskRegistry::new();
        let (tx, rx) = oneshot::channel();
        let id = registry.start(key("a"), move |id, key, _| async move {
            let _ = tx.send((id, key));
        });

        let (seen_id, seen_key) = rx.await.unwrap();
        assert_eq!(seen_id, id);
        assert_eq!(seen_key, key("a"));
    }

    #[tokio::test]
    async fn test_task_ids_are_unique() {
        let mut registry = TaskRegistry::new();
        let first = registry.start(key("a"), |_, _, _| async {});
        registry.remove(first);
        let second = registry.start(key("a"), |_, _, _| async {});

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_cancel_all_signals_workers() {
        let mut registry = TaskRegistry::new();
        let (tx, rx) = oneshot::channel();
        let (go_tx, go_rx) = oneshot::channel::<()>();
        let id = registry.start(key("a"), move |_, _, cancel| async move {
            let _ = go_rx.await;
            let _ = tx.send(cancel.is_cancelled());
        });

        assert_eq!(registry.cancel_all(), 1);
        let _ = go_tx.send(());

        assert!(rx.await.unwrap());
        assert!(!registry.is_live(id));
        assert!(!registry.is_running(&key("a")));
        assert_eq!(registry.get(id).unwrap().status(), FetchStatus::Cancelled);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_all_is_repeatable() {
        let mut registry = TaskRegistry::new();
        registry.start(key("a"), |_, _, _| async {});
        registry.start(key("b"), |_, _, _| async {});

        assert_eq!(registry.cancel_all(), 2);
        assert_eq!(registry.cancel_all(), 0);
        assert_eq!(registry.running_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let mut registry = TaskRegistry::new();
        let id = registry.start(key("a"), |_, _, _| async {});

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.status(), FetchStatus::Completed);
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_new_task_after_cancel_for_same_key() {
        let mut registry = TaskRegistry::new();
        let old = registry.start(key("a"), |_, _, _| async {});
        registry.cancel_all();

        assert!(!registry.is_running(&key("a")));
        let new = registry.start(key("a"), |_, _, _| async {});

        assert_eq!(registry.running_task(&key("a")), Some(new));
        assert_eq!(registry.running_count(), 1);
        assert!(!registry.is_live(old));
        assert!(registry.is_live(new));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_start_supersedes_running_task_for_same_key() {
        let mut registry = TaskRegistry::new();
        let (tx, rx) = oneshot::channel();
        let (go_tx, go_rx) = oneshot::channel::<()>();
        let first = registry.start(key("a"), move |_, _, cancel| async move {
            let _ = go_rx.await;
            let _ = tx.send(cancel.is_cancelled());
        });
        let second = registry.start(key("a"), |_, _, _| async {});
        let _ = go_tx.send(());

        assert!(rx.await.unwrap());
        assert_eq!(registry.get(first).unwrap().status(), FetchStatus::Cancelled);
        assert_eq!(registry.running_task(&key("a")), Some(second));
        assert_eq!(registry.running_count(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_removing_cancelled_task_keeps_newer_running_one() {
        let mut registry = TaskRegistry::new();
        let old = registry.start(key("a"), |_, _, _| async {});
        registry.cancel_all();
        let new = registry.start(key("a"), |_, _, _| async {});

        let removed = registry.remove(old).unwrap();

        assert_eq!(removed.status(), FetchStatus::Cancelled);
        assert!(registry.is_running(&key("a")));
        assert_eq!(registry.running_task(&key("a")), Some(new));

        registry.remove(new);
        assert!(!registry.is_running(&key("a")));
        assert_eq!(registry.running_count(), 0);
    }
}
