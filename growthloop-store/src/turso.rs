//! libSQL-backed implementation of every storage trait in this crate.
//!
//! One `Arc<Database>` handle is shared; each call opens its own
//! `Connection` rather than holding one across the HTTP/worker boundary,
//! matching `TursoEvalStorage`'s `db: Arc<Database>` + `async fn conn(&self)`
//! pattern.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row};
use tracing::{debug, instrument};

use growthloop_types::{
    Campaign, CampaignId, CampaignStatus, CreatorProfile, DailyContent, DailyExecution,
    LastAttemptedPhase, LearningFilter, LearningMemory, Subscription, TaskId, UsageMetric, User,
    UserId, WebhookEvent, WebhookOutcome, LEARNING_RETRIEVAL_LIMIT,
};

use crate::error::{Error, Result};
use crate::schema::ALL_SCHEMA_STATEMENTS;
use crate::traits::{CampaignStore, ContentStore, LearningStore, UserStore, WebhookLedgerStore};

/// How long a `(external_user_id, event_type)` pair is considered a likely
/// redelivery of the same logical event (spec.md §4.5).
const WEBHOOK_DEDUP_WINDOW_SECONDS: i64 = 300;

#[derive(Clone)]
pub struct TursoStore {
    db: Arc<Database>,
}

impl TursoStore {
    pub async fn new_local(path: &Path) -> Result<Self> {
        let db = Builder::new_local(path).build().await?;
        let store = Self { db: Arc::new(db) };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn new_remote(url: &str, token: &str) -> Result<Self> {
        let db = Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await?;
        let store = Self { db: Arc::new(db) };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let store = Self { db: Arc::new(db) };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn conn(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    async fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn().await?;
        for statement in ALL_SCHEMA_STATEMENTS {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidData(format!("invalid datetime: {s}")))
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(Error::from)
}

fn last_phase_str(phase: LastAttemptedPhase) -> &'static str {
    match phase {
        LastAttemptedPhase::Workflow => "workflow",
        LastAttemptedPhase::Outcome => "outcome",
    }
}

#[async_trait]
impl UserStore for TursoStore {
    #[instrument(skip(self, user), level = "debug")]
    async fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.conn().await?;
        conn.execute(
            "INSERT INTO users (user_id, email, external_identity_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                user.user_id.to_string(),
                user.email.clone(),
                user.external_identity_id.clone(),
                format_datetime(user.created_at),
                format_datetime(user.updated_at),
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT user_id, email, external_identity_id, created_at, updated_at FROM users WHERE user_id = ?",
                [user_id.to_string()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_user(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_user_by_external_id(&self, external_identity_id: &str) -> Result<Option<User>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT user_id, email, external_identity_id, created_at, updated_at FROM users WHERE external_identity_id = ?",
                [external_identity_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_user(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT user_id, email, external_identity_id, created_at, updated_at FROM users WHERE email = ?",
                [email],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_user(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, user), level = "debug")]
    async fn update_user(&self, user: &User) -> Result<()> {
        let conn = self.conn().await?;
        conn.execute(
            "UPDATE users SET email = ?, external_identity_id = ?, updated_at = ? WHERE user_id = ?",
            libsql::params![
                user.email.clone(),
                user.external_identity_id.clone(),
                format_datetime(user.updated_at),
                user.user_id.to_string(),
            ],
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_user(&self, user_id: UserId) -> Result<()> {
        let conn = self.conn().await?;
        conn.execute("DELETE FROM users WHERE user_id = ?", [user_id.to_string()])
            .await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Option<CreatorProfile>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query("SELECT data FROM creator_profiles WHERE user_id = ?", [user_id.to_string()])
            .await?;
        match rows.next().await? {
            Some(row) => {
                let data: String = row.get(0)?;
                Ok(Some(parse_json(&data)?))
            }
            None => Ok(None),
        }
    }

    async fn upsert_profile(&self, profile: &CreatorProfile) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(profile)?;
        conn.execute(
            "INSERT INTO creator_profiles (user_id, data) VALUES (?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET data = excluded.data",
            libsql::params![profile.user_id.to_string(), data],
        )
        .await?;
        Ok(())
    }

    async fn get_subscription(&self, user_id: UserId) -> Result<Option<Subscription>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query("SELECT data FROM subscriptions WHERE user_id = ?", [user_id.to_string()])
            .await?;
        match rows.next().await? {
            Some(row) => {
                let data: String = row.get(0)?;
                Ok(Some(parse_json(&data)?))
            }
            None => Ok(None),
        }
    }

    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(subscription)?;
        conn.execute(
            "INSERT INTO subscriptions (subscription_id, user_id, data) VALUES (?, ?, ?) \
             ON CONFLICT(subscription_id) DO UPDATE SET data = excluded.data",
            libsql::params![subscription.subscription_id.to_string(), subscription.user_id.to_string(), data],
        )
        .await?;
        Ok(())
    }

    async fn get_usage_metric(&self, user_id: UserId) -> Result<Option<UsageMetric>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query("SELECT data FROM usage_metrics WHERE user_id = ?", [user_id.to_string()])
            .await?;
        match rows.next().await? {
            Some(row) => {
                let data: String = row.get(0)?;
                Ok(Some(parse_json(&data)?))
            }
            None => Ok(None),
        }
    }

    async fn upsert_usage_metric(&self, usage: &UsageMetric) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(usage)?;
        conn.execute(
            "INSERT INTO usage_metrics (user_id, data) VALUES (?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET data = excluded.data",
            libsql::params![usage.user_id.to_string(), data],
        )
        .await?;
        Ok(())
    }
}

fn parse_user(row: &Row) -> Result<User> {
    let user_id: String = row.get(0)?;
    let email: String = row.get(1)?;
    let external_identity_id: Option<String> = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;
    Ok(User {
        user_id: user_id.parse().map_err(|_| Error::InvalidData(format!("invalid user id: {user_id}")))?,
        email,
        external_identity_id,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl CampaignStore for TursoStore {
    #[instrument(skip(self, campaign), level = "debug")]
    async fn create_campaign(&self, campaign: &Campaign) -> Result<()> {
        self.save_campaign_row(campaign, true).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_campaign(&self, campaign_id: CampaignId) -> Result<Option<Campaign>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query("SELECT data FROM campaigns WHERE campaign_id = ?", [campaign_id.to_string()])
            .await?;
        match rows.next().await? {
            Some(row) => {
                let data: String = row.get(0)?;
                Ok(Some(parse_json(&data)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_campaigns_by_user(&self, user_id: UserId) -> Result<Vec<Campaign>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT data FROM campaigns WHERE user_id = ? ORDER BY created_at DESC",
                [user_id.to_string()],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let data: String = row.get(0)?;
            out.push(parse_json(&data)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, campaign), level = "debug")]
    async fn save_campaign(&self, campaign: &Campaign) -> Result<()> {
        self.save_campaign_row(campaign, false).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn set_task_binding(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
        task_id: Option<TaskId>,
        last_attempted_phase: Option<LastAttemptedPhase>,
    ) -> Result<()> {
        let Some(mut campaign) = self.get_campaign(campaign_id).await? else {
            return Err(Error::NotFound(format!("campaign {campaign_id}")));
        };
        campaign.status = status;
        campaign.task_id = task_id;
        campaign.last_attempted_phase = last_attempted_phase;
        campaign.updated_at = Utc::now();
        self.save_campaign_row(&campaign, false).await
    }
}

impl TursoStore {
    async fn save_campaign_row(&self, campaign: &Campaign, insert: bool) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(campaign)?;
        let task_id = campaign.task_id.map(|t| t.to_string());
        let last_phase = campaign.last_attempted_phase.map(last_phase_str);

        if insert {
            debug!(campaign_id = %campaign.campaign_id, "inserting campaign");
            conn.execute(
                "INSERT INTO campaigns (campaign_id, user_id, status, task_id, last_attempted_phase, data, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                libsql::params![
                    campaign.campaign_id.to_string(),
                    campaign.user_id.to_string(),
                    campaign.status.as_str(),
                    task_id,
                    last_phase,
                    data,
                    format_datetime(campaign.created_at),
                    format_datetime(campaign.updated_at),
                ],
            )
            .await?;
        } else {
            conn.execute(
                "UPDATE campaigns SET status = ?, task_id = ?, last_attempted_phase = ?, data = ?, updated_at = ? WHERE campaign_id = ?",
                libsql::params![
                    campaign.status.as_str(),
                    task_id,
                    last_phase,
                    data,
                    format_datetime(campaign.updated_at),
                    campaign.campaign_id.to_string(),
                ],
            )
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for TursoStore {
    async fn upsert_daily_content(&self, content: &DailyContent) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(content)?;
        conn.execute(
            "INSERT INTO daily_content (content_id, campaign_id, day_number, platform, data) VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(campaign_id, day_number, platform) DO UPDATE SET data = excluded.data",
            libsql::params![
                content.content_id.to_string(),
                content.campaign_id.to_string(),
                content.day_number,
                content.platform.as_str(),
                data,
            ],
        )
        .await?;
        Ok(())
    }

    async fn list_daily_content(&self, campaign_id: CampaignId) -> Result<Vec<DailyContent>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT data FROM daily_content WHERE campaign_id = ? ORDER BY day_number ASC",
                [campaign_id.to_string()],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let data: String = row.get(0)?;
            out.push(parse_json(&data)?);
        }
        Ok(out)
    }

    async fn upsert_daily_execution(&self, execution: &DailyExecution) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(execution)?;
        conn.execute(
            "INSERT INTO daily_executions (execution_id, campaign_id, day_number, platform, data) VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(campaign_id, day_number, platform) DO UPDATE SET data = excluded.data",
            libsql::params![
                execution.execution_id.to_string(),
                execution.campaign_id.to_string(),
                execution.day_number,
                execution.platform.as_str(),
                data,
            ],
        )
        .await?;
        Ok(())
    }

    async fn list_daily_executions(&self, campaign_id: CampaignId) -> Result<Vec<DailyExecution>> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                "SELECT data FROM daily_executions WHERE campaign_id = ? ORDER BY day_number ASC",
                [campaign_id.to_string()],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let data: String = row.get(0)?;
            out.push(parse_json(&data)?);
        }
        Ok(out)
    }
}

#[async_trait]
impl LearningStore for TursoStore {
    async fn write_learning(&self, memory: &LearningMemory) -> Result<()> {
        let conn = self.conn().await?;
        let data = serde_json::to_string(memory)?;
        // Keyed on campaign_id so a retried outcome-analysis stage replaces
        // the prior row instead of writing a second learning memory for the
        // same campaign (invariant: exactly one per completed campaign).
        conn.execute(
            "INSERT INTO learning_memories (memory_id, user_id, campaign_id, goal_type, platform, niche, data, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(campaign_id) DO UPDATE SET \
                 memory_id = excluded.memory_id, \
                 user_id = excluded.user_id, \
                 goal_type = excluded.goal_type, \
                 platform = excluded.platform, \
                 niche = excluded.niche, \
                 data = excluded.data, \
                 created_at = excluded.created_at",
            libsql::params![
                memory.memory_id.to_string(),
                memory.user_id.to_string(),
                memory.campaign_id.to_string(),
                memory.goal_type.clone(),
                memory.platform.clone(),
                memory.niche.clone(),
                data,
                format_datetime(memory.created_at),
            ],
        )
        .await?;
        Ok(())
    }

    async fn top_learnings(&self, user_id: UserId, filter: &LearningFilter) -> Result<Vec<LearningMemory>> {
        let conn = self.conn().await?;
        let mut sql = String::from(
            "SELECT data FROM learning_memories WHERE user_id = ?",
        );
        let mut params: Vec<String> = vec![user_id.to_string()];

        if let Some(goal_type) = &filter.goal_type {
            sql.push_str(" AND goal_type = ?");
            params.push(goal_type.clone());
        }
        if let Some(platform) = &filter.platform {
            sql.push_str(" AND platform = ?");
            params.push(platform.clone());
        }
        if let Some(niche) = &filter.niche {
            sql.push_str(" AND niche = ?");
            params.push(niche.clone());
        }
        sql.push_str(&format!(" ORDER BY created_at DESC LIMIT {LEARNING_RETRIEVAL_LIMIT}"));

        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let data: String = row.get(0)?;
            out.push(parse_json(&data)?);
        }
        Ok(out)
    }
}

#[async_trait]
impl WebhookLedgerStore for TursoStore {
    #[instrument(skip(self, event), level = "debug")]
    async fn record_if_new(&self, event: &WebhookEvent) -> Result<WebhookOutcome> {
        let conn = self.conn().await?;

        let mut exact = conn
            .query("SELECT 1 FROM webhook_events WHERE event_id = ?", [event.event_id.clone()])
            .await?;
        if exact.next().await?.is_some() {
            return Ok(WebhookOutcome::DuplicateSkipped);
        }

        if let Some(external_user_id) = &event.external_user_id {
            let window_start = format_datetime(event.processed_at - chrono::Duration::seconds(WEBHOOK_DEDUP_WINDOW_SECONDS));
            let mut recent = conn
                .query(
                    "SELECT 1 FROM webhook_events WHERE external_user_id = ? AND event_type = ? AND processed_at >= ?",
                    libsql::params![external_user_id.clone(), event.event_type.clone(), window_start],
                )
                .await?;
            if recent.next().await?.is_some() {
                return Ok(WebhookOutcome::DuplicateRecentSkipped);
            }
        }

        let payload = serde_json::to_string(&event.payload)?;
        conn.execute(
            "INSERT INTO webhook_events (event_id, event_type, external_user_id, payload, processed_at) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                event.event_id.clone(),
                event.event_type.clone(),
                event.external_user_id.clone(),
                payload,
                format_datetime(event.processed_at),
            ],
        )
        .await?;

        Ok(WebhookOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> TursoStore {
        TursoStore::new_memory().await.unwrap()
    }

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            user_id: UserId::new(),
            email: "alice@example.com".to_string(),
            external_identity_id: Some("ext_1".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn user_round_trips_by_id_and_external_id() {
        let store = store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();

        let fetched = store.get_user(user.user_id).await.unwrap().unwrap();
        assert_eq!(fetched.email, user.email);

        let by_ext = store.get_user_by_external_id("ext_1").await.unwrap().unwrap();
        assert_eq!(by_ext.user_id, user.user_id);
    }

    #[tokio::test]
    async fn campaign_round_trips_and_updates() {
        let store = store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();

        let mut campaign = Campaign::new(user.user_id);
        store.create_campaign(&campaign).await.unwrap();

        campaign.status = CampaignStatus::ReadyToStart;
        store.save_campaign(&campaign).await.unwrap();

        let fetched = store.get_campaign(campaign.campaign_id).await.unwrap().unwrap();
        assert_eq!(fetched.status, CampaignStatus::ReadyToStart);
    }

    #[tokio::test]
    async fn set_task_binding_clears_prior_binding() {
        let store = store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();
        let campaign = Campaign::new(user.user_id);
        store.create_campaign(&campaign).await.unwrap();

        let task_id = TaskId::new();
        store
            .set_task_binding(campaign.campaign_id, CampaignStatus::Processing, Some(task_id), None)
            .await
            .unwrap();
        let fetched = store.get_campaign(campaign.campaign_id).await.unwrap().unwrap();
        assert_eq!(fetched.task_id, Some(task_id));

        store
            .set_task_binding(campaign.campaign_id, CampaignStatus::ProcessingFailed, None, Some(LastAttemptedPhase::Workflow))
            .await
            .unwrap();
        let fetched = store.get_campaign(campaign.campaign_id).await.unwrap().unwrap();
        assert!(fetched.task_id.is_none());
    }

    #[tokio::test]
    async fn daily_content_upsert_is_idempotent_by_key() {
        let store = store().await;
        let user = sample_user();
        store.create_user(&user).await.unwrap();
        let campaign = Campaign::new(user.user_id);
        store.create_campaign(&campaign).await.unwrap();

        let mut content = DailyContent {
            content_id: growthloop_types::ContentId::new(),
            campaign_id: campaign.campaign_id,
            day_number: 1,
            platform: growthloop_types::Platform::YouTube,
            script: Some("v1".to_string()),
            title: Some("title".to_string()),
            tags: vec![],
            cta: None,
            tweet_text: None,
            thread: vec![],
            thumbnail_urls: Default::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.upsert_daily_content(&content).await.unwrap();

        content.content_id = growthloop_types::ContentId::new();
        content.script = Some("v2".to_string());
        store.upsert_daily_content(&content).await.unwrap();

        let rows = store.list_daily_content(campaign.campaign_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].script.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn webhook_ledger_is_idempotent_on_exact_event_id() {
        let store = store().await;
        let event = WebhookEvent {
            event_id: "evt_1".to_string(),
            event_type: "user.created".to_string(),
            external_user_id: Some("ext_1".to_string()),
            payload: json!({}),
            processed_at: Utc::now(),
        };
        assert_eq!(store.record_if_new(&event).await.unwrap(), WebhookOutcome::Success);
        assert_eq!(store.record_if_new(&event).await.unwrap(), WebhookOutcome::DuplicateSkipped);
    }

    #[tokio::test]
    async fn webhook_ledger_skips_recent_duplicate_by_user_and_type() {
        let store = store().await;
        let first = WebhookEvent {
            event_id: "evt_1".to_string(),
            event_type: "user.updated".to_string(),
            external_user_id: Some("ext_1".to_string()),
            payload: json!({}),
            processed_at: Utc::now(),
        };
        store.record_if_new(&first).await.unwrap();

        let redelivered = WebhookEvent {
            event_id: "evt_2".to_string(),
            ..first.clone()
        };
        assert_eq!(
            store.record_if_new(&redelivered).await.unwrap(),
            WebhookOutcome::DuplicateRecentSkipped
        );
    }

    #[tokio::test]
    async fn learning_filter_applies_only_set_fields() {
        let store = store().await;
        let user_id = UserId::new();
        let memory = LearningMemory {
            memory_id: growthloop_types::MemoryId::new(),
            user_id,
            campaign_id: CampaignId::new(),
            goal_type: "growth".to_string(),
            platform: "youtube".to_string(),
            niche: "AI tutorials".to_string(),
            campaign_duration_days: 7,
            posting_frequency: None,
            what_worked: vec![],
            what_failed: vec![],
            recommendations: vec![],
            goal_achievement_summary: "hit the goal".to_string(),
            created_at: Utc::now(),
        };
        store.write_learning(&memory).await.unwrap();

        let all = store.top_learnings(user_id, &LearningFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);

        let filtered = store
            .top_learnings(
                user_id,
                &LearningFilter {
                    goal_type: Some("growth".to_string()),
                    platform: None,
                    niche: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);

        let miss = store
            .top_learnings(
                user_id,
                &LearningFilter {
                    goal_type: Some("retention".to_string()),
                    platform: None,
                    niche: None,
                },
            )
            .await
            .unwrap();
        assert!(miss.is_empty());
    }
}
