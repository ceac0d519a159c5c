//! A deterministic `ReasoningService` implementation with no external
//! calls. Used by `growthloop-orchestrator`'s and `growthloop-server`'s own
//! tests, and as a local default for `growthloop-cli` when no provider is
//! configured — mirroring how the teacher ships `providers::ollama`
//! alongside the bare `ModelProvider` trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::json;

use growthloop_types::{CampaignPlan, DayPlan, OutcomeReport, Platform, RealityCheckWarning};

use crate::error::Result;
use crate::service::ReasoningService;
use crate::types::{
    CompetitorRequest, CompetitorResponse, ContentRequest, ContentResponse, ContextRequest,
    ContextResponse, OutcomeRequest, OutcomeResponse, PlannerRequest, PlannerResponse,
    StrategyRequest, StrategyResponse, TwitterDraft, YouTubeDraft,
};

/// Minimum duration, below which a reality-check warning is attached to the
/// Strategy output (spec.md §4.1 "Reality check").
pub const REALITY_CHECK_THRESHOLD_DAYS: u32 = 7;

#[derive(Debug, Default)]
pub struct StubReasoningService;

impl StubReasoningService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReasoningService for StubReasoningService {
    async fn analyze_context(&self, req: ContextRequest) -> Result<ContextResponse> {
        Ok(ContextResponse {
            agent_context: json!({
                "summary": "stub context derived from the supplied profile snapshot",
                "profile_snapshot": req.profile_snapshot.0,
            }),
        })
    }

    async fn build_strategy(&self, req: StrategyRequest) -> Result<StrategyResponse> {
        let reality_check = if req.goal.duration_days < REALITY_CHECK_THRESHOLD_DAYS {
            Some(RealityCheckWarning {
                message: format!(
                    "{} days is a short window for \"{}\"; expectations may need adjusting",
                    req.goal.duration_days, req.goal.goal_aim
                ),
            })
        } else {
            None
        };

        Ok(StrategyResponse {
            strategy_output: json!({
                "goal_aim": req.goal.goal_aim,
                "intensity": req.goal.intensity,
                "past_learnings_considered": req.past_learnings.len(),
            }),
            reality_check,
        })
    }

    async fn analyze_competitor(&self, req: CompetitorRequest) -> Result<CompetitorResponse> {
        let high = req
            .classified_content
            .iter()
            .filter(|item| item.cohort == crate::types::Cohort::High)
            .count();
        let low = req
            .classified_content
            .iter()
            .filter(|item| item.cohort == crate::types::Cohort::Low)
            .count();

        Ok(CompetitorResponse {
            platform_pattern: json!({
                "platform": req.platform,
                "competitor_url": req.competitor_url,
                "high_count": high,
                "low_count": low,
            }),
        })
    }

    async fn plan_campaign(&self, req: PlannerRequest) -> Result<PlannerResponse> {
        let mut plan = CampaignPlan {
            hypothesis: format!("stub plan for {}", req.goal.goal_aim),
            platform_focus: req.goal.platforms.clone(),
            ..Default::default()
        };

        for day in 1..=req.goal.duration_days {
            let mut day_plan = DayPlan::default();
            for platform in &req.goal.platforms {
                let action = format!("day {day} action for {}", platform.as_str());
                match platform {
                    Platform::YouTube => day_plan.youtube = Some(action),
                    Platform::Twitter => day_plan.twitter = Some(action),
                }
            }
            plan.set_day(day, day_plan);
        }

        Ok(PlannerResponse { campaign_plan: plan })
    }

    async fn generate_content(&self, req: ContentRequest) -> Result<ContentResponse> {
        let youtube = req.day_plan.youtube.as_ref().map(|action| YouTubeDraft {
            script: format!("{action} (day {} of {})", req.day_number, req.duration_days),
            title: format!("Day {}: {}", req.day_number, req.goal_type),
            tags: vec![req.goal_type.clone()],
            cta: "Subscribe for more".to_string(),
        });

        let twitter = req.day_plan.twitter.as_ref().map(|action| TwitterDraft {
            tweet_text: Some(format!("{action} (day {})", req.day_number)),
            thread: Vec::new(),
        });

        Ok(ContentResponse { youtube, twitter })
    }

    async fn analyze_outcome(&self, req: OutcomeRequest) -> Result<OutcomeResponse> {
        let mut goal_vs_result = BTreeMap::new();
        goal_vs_result.insert("goal_aim".to_string(), json!(req.goal.goal_aim));
        goal_vs_result.insert("days_executed".to_string(), json!(req.daily_executions.len()));

        let what_worked = if req.daily_executions.is_empty() {
            Vec::new()
        } else {
            vec!["content was published on schedule".to_string()]
        };

        Ok(OutcomeResponse {
            outcome_report: OutcomeReport {
                goal_vs_result,
                what_worked,
                what_failed: Vec::new(),
                next_campaign_suggestions: vec!["stub suggestion: iterate on cadence".to_string()],
                actual_metrics: req.actual_metrics,
            },
        })
    }
}
