//! User, creator profile, and the inert billing shells (spec.md §3, SPEC_FULL.md §3).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A user, created only by the webhook ledger (never by self-service).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub external_identity_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Phase-1 (required) and Phase-2 (optional) onboarding fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreatorProfile {
    pub user_id: UserId,

    // Phase 1 - required.
    pub name: String,
    pub creator_type: String,
    pub niche: String,
    pub target_audience_niche: String,
    pub existing_platforms: Vec<String>,
    pub platform_urls: BTreeMap<String, String>,

    // Phase 2 - optional.
    pub unique_angle: Option<String>,
    pub purpose: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub target_platforms: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub audience_demographics: Option<serde_json::Value>,
    pub competitor_accounts: Option<BTreeMap<String, String>>,
    pub existing_assets: Option<Vec<String>>,
    pub motivation: Option<String>,
    pub phase2_completed: bool,

    /// Populated by the Context stage.
    pub agent_context: BTreeMap<String, serde_json::Value>,
    pub recommended_frequency: Option<String>,
}

/// The ten Phase-2 optional fields, used to compute completion percentage
/// (SPEC_FULL.md §2, `GET /profile/completion`).
const PHASE2_FIELD_COUNT: usize = 10;

impl CreatorProfile {
    /// Fraction of the ten Phase-2 fields that are populated, in `[0.0, 1.0]`.
    #[must_use]
    pub fn phase2_completion(&self) -> f64 {
        let set = [
            self.unique_angle.is_some(),
            self.purpose.is_some(),
            self.strengths.is_some(),
            self.target_platforms.is_some(),
            self.topics.is_some(),
            self.audience_demographics.is_some(),
            self.competitor_accounts.is_some(),
            self.existing_assets.is_some(),
            self.motivation.is_some(),
            self.phase2_completed,
        ]
        .into_iter()
        .filter(|set| *set)
        .count();

        set as f64 / PHASE2_FIELD_COUNT as f64
    }

    /// Whether the seven Phase-1 fields required to create a campaign are set.
    #[must_use]
    pub fn phase1_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.creator_type.is_empty()
            && !self.niche.is_empty()
            && !self.target_audience_niche.is_empty()
            && !self.existing_platforms.is_empty()
            && !self.platform_urls.is_empty()
    }
}

/// Free-tier billing shell created alongside a new user (SPEC_FULL.md §3).
/// Carries no quota-enforcement logic; billing is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: uuid::Uuid,
    pub user_id: UserId,
    pub plan_tier: String,
    pub status: String,
    pub current_period_start: NaiveDate,
    pub current_period_end: NaiveDate,
    pub auto_renew_enabled: bool,
}

impl Subscription {
    #[must_use]
    pub fn free_tier(user_id: UserId, today: NaiveDate) -> Self {
        Self {
            subscription_id: uuid::Uuid::new_v4(),
            user_id,
            plan_tier: "free".to_string(),
            status: "active".to_string(),
            current_period_start: today,
            current_period_end: today,
            auto_renew_enabled: false,
        }
    }
}

/// Usage-metric shell created alongside a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetric {
    pub user_id: UserId,
    pub campaigns_created: u32,
    pub campaigns_limit: u32,
    pub image_credits_base: u32,
    pub image_credits_topup: u32,
    pub image_credits_used_this_month: u32,
    pub last_reset_at: DateTime<Utc>,
}

impl UsageMetric {
    #[must_use]
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            campaigns_created: 0,
            campaigns_limit: 3,
            image_credits_base: 0,
            image_credits_topup: 0,
            image_credits_used_this_month: 0,
            last_reset_at: Utc::now(),
        }
    }
}
