//! growthloop-orchestrator: the campaign state machine's workflow executor
//! (spec.md component C7, §4.1).

pub mod config;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod stage;
pub mod workflow;

pub use config::OrchestratorConfig;
pub use enrich::{ImageEnricher, NoopImageEnricher, NoopSeoEnricher, SeoEnricher};
pub use error::{Error, Result, StageError};
pub use fetch::{CompetitorFetcher, FetchOutcome, LiveCompetitorFetcher};
pub use stage::Stage;
pub use workflow::WorkflowRunner;
