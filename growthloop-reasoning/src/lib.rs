//! growthloop-reasoning: the `ReasoningService` interface (spec.md §2,
//! component C3) plus a deterministic stub implementation.
//!
//! The real LLM prompt engineering and provider wiring are out of scope —
//! this crate only fixes the contract six pipeline stages speak through.

pub mod error;
pub mod service;
pub mod stub;
pub mod types;

pub use error::{Error, Result};
pub use service::ReasoningService;
pub use stub::{StubReasoningService, REALITY_CHECK_THRESHOLD_DAYS};
pub use types::{
    ClassifiedItem, Cohort, CompetitorRequest, CompetitorResponse, ContentRequest,
    ContentResponse, ContextRequest, ContextResponse, OutcomeRequest, OutcomeResponse,
    PlannerRequest, PlannerResponse, StrategyRequest, StrategyResponse, TwitterDraft, YouTubeDraft,
};
