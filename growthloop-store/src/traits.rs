//! Storage seams (spec.md §4, components C4/C5/C6). Split by aggregate
//! rather than by CQRS read/write side — unlike the teacher's
//! event-sourced projection, this engine writes its own state directly, so
//! there is no separate apply-from-event path to keep distinct.

use async_trait::async_trait;

use growthloop_types::{
    Campaign, CampaignId, CampaignStatus, CreatorProfile, DailyContent, DailyExecution,
    LastAttemptedPhase, LearningFilter, LearningMemory, Subscription, TaskId, UsageMetric, User,
    UserId, WebhookEvent, WebhookOutcome,
};

use crate::error::Result;

/// Users, creator profiles, and the billing shells that ride along with
/// them (spec.md §3; `Subscription`/`UsageMetric` are the SPEC_FULL
/// supplement).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<()>;
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>>;
    async fn get_user_by_external_id(&self, external_identity_id: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Replace `email`/`external_identity_id`/`updated_at` on an existing
    /// row (webhook `user.created`-on-existing-email and `user.updated`,
    /// spec.md §4.5).
    async fn update_user(&self, user: &User) -> Result<()>;
    async fn delete_user(&self, user_id: UserId) -> Result<()>;

    async fn get_profile(&self, user_id: UserId) -> Result<Option<CreatorProfile>>;
    async fn upsert_profile(&self, profile: &CreatorProfile) -> Result<()>;

    async fn get_subscription(&self, user_id: UserId) -> Result<Option<Subscription>>;
    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<()>;

    async fn get_usage_metric(&self, user_id: UserId) -> Result<Option<UsageMetric>>;
    async fn upsert_usage_metric(&self, usage: &UsageMetric) -> Result<()>;
}

/// Campaign aggregate persistence (spec.md component C4, `StateStore`).
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<()>;
    async fn get_campaign(&self, campaign_id: CampaignId) -> Result<Option<Campaign>>;
    async fn list_campaigns_by_user(&self, user_id: UserId) -> Result<Vec<Campaign>>;

    /// Replace the full row. Callers pass the campaign already advanced
    /// through `growthloop_types::status::transition`; this trait does not
    /// re-validate the state machine.
    async fn save_campaign(&self, campaign: &Campaign) -> Result<()>;

    /// Convenience used by the orchestrator and task runtime to flip just
    /// the runtime-binding columns (invariant I5) without a full read-modify-write.
    async fn set_task_binding(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
        task_id: Option<TaskId>,
        last_attempted_phase: Option<LastAttemptedPhase>,
    ) -> Result<()>;
}

/// Per-day content and posting-execution records (spec.md §3).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Idempotent upsert keyed by `(campaign_id, day_number, platform)`.
    async fn upsert_daily_content(&self, content: &DailyContent) -> Result<()>;
    async fn list_daily_content(&self, campaign_id: CampaignId) -> Result<Vec<DailyContent>>;

    async fn upsert_daily_execution(&self, execution: &DailyExecution) -> Result<()>;
    async fn list_daily_executions(&self, campaign_id: CampaignId) -> Result<Vec<DailyExecution>>;
}

/// Past-campaign learnings (spec.md component C6, `LearningStore`).
#[async_trait]
pub trait LearningStore: Send + Sync {
    async fn write_learning(&self, memory: &LearningMemory) -> Result<()>;

    /// Missing filter fields are not applied (spec.md §4.6). Results are
    /// capped at [`growthloop_types::LEARNING_RETRIEVAL_LIMIT`], most
    /// recent first.
    async fn top_learnings(&self, user_id: UserId, filter: &LearningFilter) -> Result<Vec<LearningMemory>>;
}

/// The webhook idempotency ledger (spec.md component C5, invariant I7).
#[async_trait]
pub trait WebhookLedgerStore: Send + Sync {
    /// Record `event` if it has not been seen, per spec.md §4.5's two-tier
    /// idempotency check (exact `event_id` match, then a 5-minute window on
    /// `(external_user_id, event_type)`). The caller's user mutation must
    /// happen inside the same storage transaction as a `Success` result;
    /// this trait only guards entry into that transaction.
    async fn record_if_new(&self, event: &WebhookEvent) -> Result<WebhookOutcome>;
}
