//! Campaign lifecycle endpoints (spec.md §6). Every handler deserializes,
//! calls one store/task-broker/orchestrator method, and serializes the
//! response — the state-machine legality check itself lives in
//! `growthloop_types::transition`, never re-derived here.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use growthloop_types::{
    transition, Action, Campaign, CampaignId, CampaignStatus, DailyExecution, ExecutionId,
    OnboardingData, OutcomeReport, Platform,
};
use growthloop_store::{CampaignStore, ContentStore};
use growthloop_tasks::{TaskBroker, TaskKind};

use crate::error::{ApiError, Result};
use crate::middleware::AuthContext;
use crate::state::AppState;

fn ensure_owner(campaign: &Campaign, auth: AuthContext) -> Result<()> {
    if campaign.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

async fn load_owned(state: &AppState, auth: AuthContext, campaign_id: CampaignId) -> Result<Campaign> {
    let campaign = state
        .campaigns
        .get_campaign(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("campaign {campaign_id}")))?;
    ensure_owner(&campaign, auth)?;
    Ok(campaign)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Campaign>> {
    let campaign = Campaign::new(auth.user_id);
    state.campaigns.create_campaign(&campaign).await?;
    Ok(Json(campaign))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<Campaign>> {
    Ok(Json(load_owned(&state, auth, campaign_id).await?))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Campaign>>> {
    Ok(Json(state.campaigns.list_campaigns_by_user(auth.user_id).await?))
}

pub async fn update_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
    Json(patch): Json<OnboardingData>,
) -> Result<Json<Campaign>> {
    let mut campaign = load_owned(&state, auth, campaign_id).await?;
    if !campaign.status.onboarding_editable() {
        return Err(transition(campaign.status, Action::UpdateOnboarding, None)
            .unwrap_err()
            .into());
    }
    campaign.onboarding_data = campaign.onboarding_data.merge(patch);
    campaign.updated_at = chrono::Utc::now();
    state.campaigns.save_campaign(&campaign).await?;
    Ok(Json(campaign))
}

pub async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<Campaign>> {
    let mut campaign = load_owned(&state, auth, campaign_id).await?;

    let goal = campaign
        .onboarding_data
        .goal
        .as_ref()
        .ok_or_else(|| ApiError::ValidationFailed("goal is required to complete onboarding".to_string()))?;
    if !(3..=30).contains(&goal.duration_days) {
        return Err(ApiError::ValidationFailed(
            "goal.duration_days must be between 3 and 30".to_string(),
        ));
    }

    campaign.status = transition(campaign.status, Action::CompleteOnboarding, None)?;
    campaign.updated_at = chrono::Utc::now();
    state.campaigns.save_campaign(&campaign).await?;

    let has_prior_completed = state
        .campaigns
        .list_campaigns_by_user(auth.user_id)
        .await
        .map(|campaigns| {
            campaigns
                .iter()
                .any(|c| c.campaign_id != campaign_id && c.status == CampaignStatus::Completed)
        })
        .unwrap_or(false);

    if has_prior_completed {
        if let Err(e) = state
            .tasks
            .enqueue(TaskKind::AnalyzePreviousCampaigns {
                user_id: auth.user_id,
                campaign_id,
            })
            .await
        {
            tracing::warn!(error = %e, %campaign_id, "failed to enqueue past-campaign analysis");
        }
    }

    Ok(Json(campaign))
}

#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub task_id: growthloop_types::TaskId,
    pub polling_url: String,
}

pub async fn start(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<EnqueueResponse>> {
    let mut campaign = load_owned(&state, auth, campaign_id).await?;

    let next_status = transition(campaign.status, Action::EnqueueWorkflow, campaign.last_attempted_phase)?;
    let task_id = state
        .tasks
        .enqueue(TaskKind::RunCampaignWorkflow { campaign_id })
        .await?;

    campaign.status = next_status;
    campaign.task_id = Some(task_id);
    campaign.updated_at = chrono::Utc::now();
    state.campaigns.save_campaign(&campaign).await?;
    state
        .campaigns
        .set_task_binding(campaign_id, next_status, Some(task_id), None)
        .await?;

    Ok(Json(EnqueueResponse {
        task_id,
        polling_url: format!("/tasks/{task_id}"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub actual_metrics: BTreeMap<String, f64>,
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<EnqueueResponse>> {
    let mut campaign = load_owned(&state, auth, campaign_id).await?;

    let next_status = transition(campaign.status, Action::CompleteWithMetrics, None)?;
    let task_id = state
        .tasks
        .enqueue(TaskKind::AnalyzeCampaignOutcome {
            campaign_id,
            actual_metrics: req.actual_metrics,
        })
        .await?;

    campaign.status = next_status;
    campaign.task_id = Some(task_id);
    campaign.updated_at = chrono::Utc::now();
    state.campaigns.save_campaign(&campaign).await?;
    state
        .campaigns
        .set_task_binding(campaign_id, next_status, Some(task_id), None)
        .await?;

    Ok(Json(EnqueueResponse {
        task_id,
        polling_url: format!("/tasks/{task_id}"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmDayRequest {
    pub platform: Platform,
    #[serde(default)]
    pub posted_to_youtube: bool,
    #[serde(default)]
    pub posted_to_twitter: bool,
    #[serde(default)]
    pub engagement_metrics: BTreeMap<String, f64>,
}

pub async fn confirm_day(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path((campaign_id, day_number)): Path<(CampaignId, u32)>,
    Json(req): Json<ConfirmDayRequest>,
) -> Result<Json<DailyExecution>> {
    load_owned(&state, auth, campaign_id).await?;

    if !growthloop_types::DailyContent::is_day_number_valid(day_number) {
        return Err(ApiError::ValidationFailed(format!(
            "day_number {day_number} must be in [1, 30]"
        )));
    }

    let execution = DailyExecution {
        execution_id: ExecutionId::new(),
        campaign_id,
        day_number,
        platform: req.platform,
        posted_to_youtube: req.posted_to_youtube,
        posted_to_twitter: req.posted_to_twitter,
        posted_at: Some(chrono::Utc::now()),
        engagement_metrics: req.engagement_metrics,
    };
    state.content.upsert_daily_execution(&execution).await?;
    Ok(Json(execution))
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub campaign_plan: Option<growthloop_types::CampaignPlan>,
    pub content: Vec<growthloop_types::DailyContent>,
    pub executions: Vec<DailyExecution>,
}

pub async fn schedule(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<ScheduleResponse>> {
    let campaign = load_owned(&state, auth, campaign_id).await?;
    let content = state.content.list_daily_content(campaign_id).await?;
    let executions = state.content.list_daily_executions(campaign_id).await?;
    Ok(Json(ScheduleResponse {
        campaign_plan: campaign.campaign_plan,
        content,
        executions,
    }))
}

pub async fn report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<OutcomeReport>> {
    let campaign = load_owned(&state, auth, campaign_id).await?;
    if campaign.status != CampaignStatus::Completed {
        return Err(ApiError::ValidationFailed(
            "outcome report is only available once the campaign is completed".to_string(),
        ));
    }
    campaign
        .outcome_report
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("outcome report for campaign {campaign_id}")))
}
