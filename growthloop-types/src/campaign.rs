//! Campaign aggregate: onboarding payload, plan, outputs (spec.md §3).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CampaignId, UserId};
use crate::status::CampaignStatus;

/// Posting cadence requested for the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Moderate,
    Intense,
}

/// The platforms a campaign operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    YouTube,
    Twitter,
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Twitter => "twitter",
        }
    }
}

/// A user-declared growth target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub goal_aim: String,
    pub goal_type: String,
    pub platforms: Vec<Platform>,
    /// Invariant I3: must be in `[3, 30]`.
    pub duration_days: u32,
    pub intensity: Intensity,
}

/// A competitor to run forensics against on a given platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorRef {
    pub platform: Platform,
    pub url: String,
}

/// Per-campaign toggles for optional pipeline stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct AgentToggles {
    #[serde(default = "default_true")]
    pub run_forensics: bool,
    #[serde(default)]
    pub enable_image_generation: bool,
    #[serde(default)]
    pub enable_seo_rewrite: bool,
}

fn default_true() -> bool {
    true
}

/// The campaign's onboarding payload (spec.md §3, `onboarding_data`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OnboardingData {
    pub goal: Option<Goal>,
    pub competitors: Vec<CompetitorRef>,
    pub metrics: BTreeMap<String, f64>,
    pub toggles: AgentToggles,
}

impl OnboardingData {
    /// Merge `other` on top of `self`: `Some`/non-empty fields in `other`
    /// replace `self`'s; fields `other` leaves unset are kept from `self`.
    /// Backs the round-trip law in spec.md §8:
    /// `update(update(c, P1), P2) == update(c, merge(P1, P2))`.
    #[must_use]
    pub fn merge(mut self, other: OnboardingData) -> Self {
        if other.goal.is_some() {
            self.goal = other.goal;
        }
        if !other.competitors.is_empty() {
            self.competitors = other.competitors;
        }
        for (k, v) in other.metrics {
            self.metrics.insert(k, v);
        }
        self.toggles = other.toggles;
        self
    }
}

/// Per-platform action text for a single day of the plan.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DayPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// `campaign_plan` schema (spec.md §6): days 1-3 named explicitly, the rest
/// keyed by integer day number.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CampaignPlan {
    pub day_1: Option<DayPlan>,
    pub day_2: Option<DayPlan>,
    pub day_3: Option<DayPlan>,
    pub extra_days: BTreeMap<u32, DayPlan>,
    pub hypothesis: String,
    pub platform_focus: Vec<Platform>,
    /// Populated on failure/cancellation; `campaign_plan.error` per spec.md §7.
    pub error: Option<String>,
}

impl CampaignPlan {
    /// Day plan for any day number 1..=30, whichever storage slot holds it.
    #[must_use]
    pub fn day(&self, day_number: u32) -> Option<&DayPlan> {
        match day_number {
            1 => self.day_1.as_ref(),
            2 => self.day_2.as_ref(),
            3 => self.day_3.as_ref(),
            n => self.extra_days.get(&n),
        }
    }

    pub fn set_day(&mut self, day_number: u32, plan: DayPlan) {
        match day_number {
            1 => self.day_1 = Some(plan),
            2 => self.day_2 = Some(plan),
            3 => self.day_3 = Some(plan),
            n => {
                self.extra_days.insert(n, plan);
            }
        }
    }
}

/// `outcome_report` schema (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutcomeReport {
    pub goal_vs_result: BTreeMap<String, serde_json::Value>,
    pub what_worked: Vec<String>,
    pub what_failed: Vec<String>,
    pub next_campaign_suggestions: Vec<String>,
    pub actual_metrics: BTreeMap<String, f64>,
}

/// Warning attached to `content_warnings` when `duration_days < 7`
/// (spec.md §4.1 "Reality check").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealityCheckWarning {
    pub message: String,
}

/// Snapshot of the creator profile taken at campaign-creation time
/// (`profile_snapshot`, immutable thereafter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot(pub serde_json::Value);

/// The `Campaign` aggregate (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub status: CampaignStatus,
    pub onboarding_data: OnboardingData,
    pub profile_snapshot: Option<ProfileSnapshot>,
    pub strategy_output: Option<serde_json::Value>,
    pub forensics_output: BTreeMap<String, serde_json::Value>,
    pub campaign_plan: Option<CampaignPlan>,
    pub outcome_report: Option<OutcomeReport>,
    pub learning_insights: Option<serde_json::Value>,
    pub content_warnings: Vec<RealityCheckWarning>,
    /// Current runtime binding; invariant I5: at most one live value.
    pub task_id: Option<crate::ids::TaskId>,
    pub last_attempted_phase: Option<crate::status::LastAttemptedPhase>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            campaign_id: CampaignId::new(),
            user_id,
            status: CampaignStatus::OnboardingIncomplete,
            onboarding_data: OnboardingData::default(),
            profile_snapshot: None,
            strategy_output: None,
            forensics_output: BTreeMap::new(),
            campaign_plan: None,
            outcome_report: None,
            learning_insights: None,
            content_warnings: Vec::new(),
            task_id: None,
            last_attempted_phase: None,
            created_at: now,
            updated_at: now,
        }
    }
}
