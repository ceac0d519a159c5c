//! The `ReasoningService` interface (spec.md §2, component C3).
//!
//! Six typed operations, one per pipeline stage. The orchestrator only ever
//! talks to this trait object; the concrete LLM/provider wiring is replaced
//! without touching orchestration code, the same seam
//! `vibes_models::providers::ModelProvider` gives the teacher's inference
//! call sites.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CompetitorRequest, CompetitorResponse, ContentRequest, ContentResponse, ContextRequest,
    ContextResponse, OutcomeRequest, OutcomeResponse, PlannerRequest, PlannerResponse,
    StrategyRequest, StrategyResponse,
};

#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn analyze_context(&self, req: ContextRequest) -> Result<ContextResponse>;

    async fn build_strategy(&self, req: StrategyRequest) -> Result<StrategyResponse>;

    async fn analyze_competitor(&self, req: CompetitorRequest) -> Result<CompetitorResponse>;

    async fn plan_campaign(&self, req: PlannerRequest) -> Result<PlannerResponse>;

    async fn generate_content(&self, req: ContentRequest) -> Result<ContentResponse>;

    async fn analyze_outcome(&self, req: OutcomeRequest) -> Result<OutcomeResponse>;
}
