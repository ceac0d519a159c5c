//! In-memory [`TaskBroker`]/[`TaskResultStore`], the default runtime for a
//! single-process worker and the backbone of the crate's tests. Grounded on
//! the teacher's `vibes_iggy::memory::InMemoryEventLog`, which also guards a
//! `VecDeque` behind a lock; here the lock is `tokio::sync::Mutex` per the
//! async access pattern workers need.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use growthloop_types::TaskId;

use crate::error::{Error, Result};
use crate::traits::{TaskBroker, TaskResultStore};
use crate::types::{Task, TaskKind, TaskStatus};

/// Maximum attempts for a retryable task (spec.md §4.2).
pub const MAX_ATTEMPTS: u32 = 3;

struct Delayed {
    task: QueuedTask,
    not_before: Instant,
}

#[derive(Clone)]
struct QueuedTask {
    task_id: TaskId,
    kind: TaskKind,
    attempt: u32,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<QueuedTask>,
    delayed: Vec<Delayed>,
    running: HashMap<TaskId, QueuedTask>,
    cancelled: HashSet<TaskId>,
    statuses: HashMap<TaskId, TaskStatus>,
}

/// Single-process task queue backed by a mutex-guarded deque. Suitable as
/// the default broker and for tests; a durable deployment swaps this for a
/// store-backed implementation without changing callers.
#[derive(Default)]
pub struct InMemoryTaskBroker {
    inner: Mutex<Inner>,
}

impl InMemoryTaskBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn promote_eligible(inner: &mut Inner, now: Instant) {
        let mut i = 0;
        while i < inner.delayed.len() {
            if inner.delayed[i].not_before <= now {
                let delayed = inner.delayed.remove(i);
                inner.queue.push_back(delayed.task);
            } else {
                i += 1;
            }
        }
    }
}

#[async_trait]
impl TaskBroker for InMemoryTaskBroker {
    async fn enqueue(&self, kind: TaskKind) -> Result<TaskId> {
        let task_id = TaskId::new();
        let campaign_id = kind.campaign_id();
        let mut inner = self.inner.lock().await;
        inner.queue.push_back(QueuedTask {
            task_id,
            kind,
            attempt: 1,
        });
        inner
            .statuses
            .insert(task_id, TaskStatus::pending(task_id, campaign_id));
        Ok(task_id)
    }

    async fn poll_next(&self) -> Result<Option<Task>> {
        let mut inner = self.inner.lock().await;
        Self::promote_eligible(&mut inner, Instant::now());
        while let Some(queued) = inner.queue.pop_front() {
            if inner.cancelled.remove(&queued.task_id) {
                continue;
            }
            let task = Task {
                task_id: queued.task_id,
                kind: queued.kind.clone(),
                attempt: queued.attempt,
            };
            inner.running.insert(queued.task_id, queued);
            return Ok(Some(task));
        }
        Ok(None)
    }

    async fn ack(&self, task_id: TaskId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .running
            .remove(&task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
        Ok(())
    }

    async fn nack_retry(&self, task_id: TaskId) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let queued = inner
            .running
            .remove(&task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;

        if !queued.kind.is_retryable() {
            return Ok(false);
        }
        let next_attempt = queued.attempt + 1;
        if next_attempt > MAX_ATTEMPTS {
            return Ok(false);
        }

        let backoff = Duration::from_secs(2u64.pow(next_attempt));
        inner.delayed.push(Delayed {
            task: QueuedTask {
                task_id,
                kind: queued.kind,
                attempt: next_attempt,
            },
            not_before: Instant::now() + backoff,
        });
        Ok(true)
    }

    async fn cancel(&self, task_id: TaskId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let was_queued_len = inner.queue.len();
        inner.queue.retain(|t| t.task_id != task_id);
        let removed_from_queue = inner.queue.len() != was_queued_len;

        if !removed_from_queue {
            inner.delayed.retain(|d| d.task.task_id != task_id);
        }
        if inner.running.contains_key(&task_id) {
            inner.cancelled.insert(task_id);
        }
        Ok(())
    }

    async fn is_cancelled(&self, task_id: TaskId) -> Result<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.cancelled.contains(&task_id))
    }
}

#[async_trait]
impl TaskResultStore for InMemoryTaskBroker {
    async fn set_status(&self, status: TaskStatus) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.statuses.insert(status.task_id, status);
        Ok(())
    }

    async fn get_status(&self, task_id: TaskId) -> Result<Option<TaskStatus>> {
        let inner = self.inner.lock().await;
        Ok(inner.statuses.get(&task_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growthloop_types::CampaignId;

    fn sample_kind() -> TaskKind {
        TaskKind::RunCampaignWorkflow {
            campaign_id: CampaignId::new(),
        }
    }

    #[tokio::test]
    async fn enqueue_then_poll_returns_the_task_at_attempt_one() {
        let broker = InMemoryTaskBroker::new();
        let task_id = broker.enqueue(sample_kind()).await.unwrap();
        let task = broker.poll_next().await.unwrap().unwrap();
        assert_eq!(task.task_id, task_id);
        assert_eq!(task.attempt, 1);
    }

    #[tokio::test]
    async fn empty_queue_polls_to_none() {
        let broker = InMemoryTaskBroker::new();
        assert!(broker.poll_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ack_clears_the_running_entry() {
        let broker = InMemoryTaskBroker::new();
        let task_id = broker.enqueue(sample_kind()).await.unwrap();
        broker.poll_next().await.unwrap();
        broker.ack(task_id).await.unwrap();
        assert!(broker.ack(task_id).await.is_err());
    }

    #[tokio::test]
    async fn nack_retry_requeues_with_incremented_attempt_after_backoff() {
        let broker = InMemoryTaskBroker::new();
        let task_id = broker.enqueue(sample_kind()).await.unwrap();
        broker.poll_next().await.unwrap();
        let retried = broker.nack_retry(task_id).await.unwrap();
        assert!(retried);

        assert!(broker.poll_next().await.unwrap().is_none());

        {
            let mut inner = broker.inner.lock().await;
            for delayed in &mut inner.delayed {
                delayed.not_before = Instant::now() - Duration::from_secs(1);
            }
        }

        let task = broker.poll_next().await.unwrap().unwrap();
        assert_eq!(task.task_id, task_id);
        assert_eq!(task.attempt, 2);
    }

    #[tokio::test]
    async fn nack_retry_gives_up_after_max_attempts() {
        let broker = InMemoryTaskBroker::new();
        let task_id = broker.enqueue(sample_kind()).await.unwrap();

        for expected_attempt in 1..MAX_ATTEMPTS {
            let task = broker.poll_next().await.unwrap().unwrap();
            assert_eq!(task.attempt, expected_attempt);
            assert!(broker.nack_retry(task_id).await.unwrap());
            let mut inner = broker.inner.lock().await;
            for delayed in &mut inner.delayed {
                delayed.not_before = Instant::now() - Duration::from_secs(1);
            }
        }

        let task = broker.poll_next().await.unwrap().unwrap();
        assert_eq!(task.attempt, MAX_ATTEMPTS);
        assert!(!broker.nack_retry(task_id).await.unwrap());
    }

    #[tokio::test]
    async fn analyze_previous_campaigns_is_never_retried() {
        let broker = InMemoryTaskBroker::new();
        let kind = TaskKind::AnalyzePreviousCampaigns {
            user_id: growthloop_types::UserId::new(),
            campaign_id: CampaignId::new(),
        };
        let task_id = broker.enqueue(kind).await.unwrap();
        broker.poll_next().await.unwrap();
        assert!(!broker.nack_retry(task_id).await.unwrap());
    }

    #[tokio::test]
    async fn cancel_removes_a_pending_task_before_it_is_polled() {
        let broker = InMemoryTaskBroker::new();
        let task_id = broker.enqueue(sample_kind()).await.unwrap();
        broker.cancel(task_id).await.unwrap();
        assert!(broker.poll_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancel_marks_a_running_task_so_poll_never_redelivers_it() {
        let broker = InMemoryTaskBroker::new();
        let task_id = broker.enqueue(sample_kind()).await.unwrap();
        broker.poll_next().await.unwrap();
        broker.cancel(task_id).await.unwrap();
        assert!(broker.ack(task_id).await.is_ok());
    }

    #[tokio::test]
    async fn status_round_trips() {
        let broker = InMemoryTaskBroker::new();
        let campaign_id = CampaignId::new();
        let task_id = broker
            .enqueue(TaskKind::RunCampaignWorkflow { campaign_id })
            .await
            .unwrap();

        let fetched = broker.get_status(task_id).await.unwrap().unwrap();
        assert_eq!(fetched.state, crate::types::TaskState::Pending);
        assert!(fetched.redirect_url().is_none());

        let mut success = fetched;
        success.state = crate::types::TaskState::Success;
        success.progress = 100;
        broker.set_status(success).await.unwrap();

        let fetched = broker.get_status(task_id).await.unwrap().unwrap();
        assert_eq!(
            fetched.redirect_url(),
            Some(format!("/campaigns/{campaign_id}"))
        );
    }
}
