//! Creator profile onboarding (spec.md §6: `POST/GET /onboarding`,
//! `PATCH /profile/phase2`, `GET /profile/completion`).

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use growthloop_store::UserStore;
use growthloop_types::CreatorProfile;

use crate::error::{ApiError, Result};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Phase-1 required fields (spec.md §3).
#[derive(Debug, Deserialize)]
pub struct Phase1Request {
    pub name: String,
    pub creator_type: String,
    pub niche: String,
    pub target_audience_niche: String,
    pub existing_platforms: Vec<String>,
    pub platform_urls: std::collections::BTreeMap<String, String>,
}

pub async fn upsert_phase1(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<Phase1Request>,
) -> Result<Json<CreatorProfile>> {
    let mut profile = state
        .users
        .get_profile(auth.user_id)
        .await?
        .unwrap_or_else(|| default_profile(auth.user_id));

    profile.name = req.name;
    profile.creator_type = req.creator_type;
    profile.niche = req.niche;
    profile.target_audience_niche = req.target_audience_niche;
    profile.existing_platforms = req.existing_platforms;
    profile.platform_urls = req.platform_urls;

    state.users.upsert_profile(&profile).await?;
    Ok(Json(profile))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CreatorProfile>> {
    let profile = state
        .users
        .get_profile(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("creator profile".to_string()))?;
    Ok(Json(profile))
}

/// Phase-2 optional fields; any field left `None` leaves the stored value
/// untouched (spec.md §3 phase-2 completion tracking).
#[derive(Debug, Deserialize, Default)]
pub struct Phase2Request {
    pub unique_angle: Option<String>,
    pub purpose: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub target_platforms: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub audience_demographics: Option<Value>,
    pub competitor_accounts: Option<std::collections::BTreeMap<String, String>>,
    pub existing_assets: Option<Vec<String>>,
    pub motivation: Option<String>,
    pub phase2_completed: Option<bool>,
}

pub async fn update_phase2(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<Phase2Request>,
) -> Result<Json<CreatorProfile>> {
    let mut profile = state
        .users
        .get_profile(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("creator profile".to_string()))?;

    if req.unique_angle.is_some() {
        profile.unique_angle = req.unique_angle;
    }
    if req.purpose.is_some() {
        profile.purpose = req.purpose;
    }
    if req.strengths.is_some() {
        profile.strengths = req.strengths;
    }
    if req.target_platforms.is_some() {
        profile.target_platforms = req.target_platforms;
    }
    if req.topics.is_some() {
        profile.topics = req.topics;
    }
    if req.audience_demographics.is_some() {
        profile.audience_demographics = req.audience_demographics;
    }
    if req.competitor_accounts.is_some() {
        profile.competitor_accounts = req.competitor_accounts;
    }
    if req.existing_assets.is_some() {
        profile.existing_assets = req.existing_assets;
    }
    if req.motivation.is_some() {
        profile.motivation = req.motivation;
    }
    if let Some(completed) = req.phase2_completed {
        profile.phase2_completed = completed;
    }

    state.users.upsert_profile(&profile).await?;
    Ok(Json(profile))
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub phase1_complete: bool,
    pub phase2_completion: f64,
}

pub async fn completion(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CompletionResponse>> {
    let profile = state.users.get_profile(auth.user_id).await?.unwrap_or_default();
    Ok(Json(CompletionResponse {
        phase1_complete: profile.phase1_complete(),
        phase2_completion: profile.phase2_completion(),
    }))
}

fn default_profile(user_id: growthloop_types::UserId) -> CreatorProfile {
    let mut profile = CreatorProfile::default();
    profile.user_id = user_id;
    profile
}
