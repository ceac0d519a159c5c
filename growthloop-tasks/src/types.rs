//! Task kinds and the status payload (spec.md §4.2, §6).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use growthloop_types::{CampaignId, TaskId, UserId};

/// The three task kinds, each parametrized by `campaign_id` (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    RunCampaignWorkflow {
        campaign_id: CampaignId,
    },
    AnalyzeCampaignOutcome {
        campaign_id: CampaignId,
        actual_metrics: BTreeMap<String, f64>,
    },
    /// Best-effort enrichment; failures do not block (spec.md §4.2) and it
    /// is never retried.
    AnalyzePreviousCampaigns {
        user_id: UserId,
        campaign_id: CampaignId,
    },
}

impl TaskKind {
    #[must_use]
    pub fn campaign_id(&self) -> CampaignId {
        match self {
            TaskKind::RunCampaignWorkflow { campaign_id }
            | TaskKind::AnalyzeCampaignOutcome { campaign_id, .. }
            | TaskKind::AnalyzePreviousCampaigns { campaign_id, .. } => *campaign_id,
        }
    }

    /// Whether a failed attempt of this kind is retried (spec.md §4.2
    /// "`AnalyzePreviousCampaigns` is never retried").
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TaskKind::AnalyzePreviousCampaigns { .. })
    }
}

/// A unit of work handed to a worker by [`crate::broker::TaskBroker`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub kind: TaskKind,
    pub attempt: u32,
}

/// The six logical states a task status can report (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Started,
    Success,
    Failure,
    Retry,
    Revoked,
}

/// The bit-exact task status payload (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub state: TaskState,
    pub progress: u8,
    pub message: String,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub campaign_id: Option<CampaignId>,
}

impl TaskStatus {
    #[must_use]
    pub fn pending(task_id: TaskId, campaign_id: CampaignId) -> Self {
        Self {
            task_id,
            state: TaskState::Pending,
            progress: 0,
            message: "queued".to_string(),
            result: None,
            error: None,
            campaign_id: Some(campaign_id),
        }
    }

    /// `/campaigns/{campaign_id}` once `state == success` and a campaign is
    /// attached; `None` otherwise (spec.md §6).
    #[must_use]
    pub fn redirect_url(&self) -> Option<String> {
        if self.state == TaskState::Success {
            self.campaign_id.map(|id| format!("/campaigns/{id}"))
        } else {
            None
        }
    }
}
