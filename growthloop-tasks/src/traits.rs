//! The broker/result-store seam (spec.md §4.2), grounded on the teacher's
//! `EventLog`/`EventConsumer` split in `vibes-iggy::traits` — here a task
//! queue plays the role of the event log, and status reporting plays the
//! role of a consumer offset.

use async_trait::async_trait;

use growthloop_types::TaskId;

use crate::error::Result;
use crate::types::{Task, TaskKind, TaskStatus};

/// Enqueues and hands out [`Task`]s to workers.
#[async_trait]
pub trait TaskBroker: Send + Sync {
    /// Enqueues a new task of the given kind and returns its id.
    async fn enqueue(&self, kind: TaskKind) -> Result<TaskId>;

    /// Pulls the next task for a worker to run, if any is queued.
    async fn poll_next(&self) -> Result<Option<Task>>;

    /// Acknowledges successful completion of `task_id`.
    async fn ack(&self, task_id: TaskId) -> Result<()>;

    /// Requeues `task_id` for another attempt after a failure, honoring the
    /// exponential backoff and max-attempts policy. Returns `false` (and
    /// leaves the task terminal) if the kind is not retryable or attempts
    /// are exhausted.
    async fn nack_retry(&self, task_id: TaskId) -> Result<bool>;

    /// Cancels a pending or running task. Pending tasks are removed outright;
    /// running tasks are marked revoked cooperatively (spec.md §4.2 cancel
    /// semantics — an in-flight reasoning call may not be interrupted).
    async fn cancel(&self, task_id: TaskId) -> Result<()>;

    /// Whether `cancel` was called on `task_id` while it was running. A
    /// worker polls this between stages to exit cooperatively.
    async fn is_cancelled(&self, task_id: TaskId) -> Result<bool>;
}

/// Tracks the latest [`TaskStatus`] reported for each task id, read by the
/// `/tasks/{task_id}` endpoint.
#[async_trait]
pub trait TaskResultStore: Send + Sync {
    async fn set_status(&self, status: TaskStatus) -> Result<()>;

    async fn get_status(&self, task_id: TaskId) -> Result<Option<TaskStatus>>;
}
