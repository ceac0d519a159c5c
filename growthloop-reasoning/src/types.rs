//! Typed request/response pairs for each of the six reasoning operations
//! (spec.md §4.1 "Stage contracts"). Classified platform content and past
//! learnings are the only inputs; everything a stage writes back is typed
//! at this boundary so `growthloop-orchestrator` never threads a raw
//! `serde_json::Value` further than one hop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use growthloop_types::{CampaignPlan, DailyExecution, DayPlan, Goal, Intensity, LearningMemory, ProfileSnapshot, RealityCheckWarning};

/// Stage 1: Context.
pub struct ContextRequest {
    pub profile_snapshot: ProfileSnapshot,
}

pub struct ContextResponse {
    pub agent_context: Value,
}

/// Stage 2: Strategy.
pub struct StrategyRequest {
    pub goal: Goal,
    pub agent_context: Value,
    pub past_learnings: Vec<LearningMemory>,
}

pub struct StrategyResponse {
    pub strategy_output: Value,
    /// Populated when `goal.duration_days < 7` (spec.md §4.1 "Reality check").
    pub reality_check: Option<RealityCheckWarning>,
}

/// A single piece of pre-classified competitor content handed to the
/// Forensics stage. The orchestrator produces these from
/// `growthloop-classify`'s high/low cohorts; this crate stays agnostic to
/// the platform-specific shape underneath.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub cohort: Cohort,
    pub content: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    High,
    Low,
}

/// Stage 3: Forensics (one call per competitor).
pub struct CompetitorRequest {
    pub platform: String,
    pub competitor_url: String,
    pub classified_content: Vec<ClassifiedItem>,
}

pub struct CompetitorResponse {
    pub platform_pattern: Value,
}

/// Stage 4: Planner.
pub struct PlannerRequest {
    pub goal: Goal,
    pub strategy_output: Value,
    pub forensics_output: BTreeMap<String, Value>,
    pub intensity: Intensity,
    pub past_learnings: Vec<LearningMemory>,
}

pub struct PlannerResponse {
    pub campaign_plan: CampaignPlan,
}

/// Stage 5: Content (one call per day).
pub struct ContentRequest {
    pub day_plan: DayPlan,
    pub profile_snapshot: ProfileSnapshot,
    pub day_number: u32,
    pub duration_days: u32,
    pub intensity: Intensity,
    pub goal_type: String,
}

/// Drafted YouTube content for one day, before enrichers run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct YouTubeDraft {
    pub script: String,
    pub title: String,
    pub tags: Vec<String>,
    pub cta: String,
}

/// Drafted Twitter/X content for one day, before enrichers run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TwitterDraft {
    pub tweet_text: Option<String>,
    pub thread: Vec<String>,
}

pub struct ContentResponse {
    pub youtube: Option<YouTubeDraft>,
    pub twitter: Option<TwitterDraft>,
}

/// Stage 6: Outcome.
pub struct OutcomeRequest {
    pub goal: Goal,
    pub campaign_plan: CampaignPlan,
    pub actual_metrics: BTreeMap<String, f64>,
    pub daily_executions: Vec<DailyExecution>,
}

pub struct OutcomeResponse {
    pub outcome_report: growthloop_types::OutcomeReport,
}
