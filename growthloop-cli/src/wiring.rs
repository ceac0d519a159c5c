//! Builds the collaborator graph shared by the `serve` and `worker`
//! subcommands from environment variables, grounded on `vibes-cli`'s
//! `commands::serve::run_foreground` pattern of turning flags/env into a
//! fully wired runtime before handing off to the library crate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use growthloop_identity::{StubTokenVerifier, TokenVerifier};
use growthloop_orchestrator::{
    enrich::{NoopImageEnricher, NoopSeoEnricher},
    fetch::LiveCompetitorFetcher,
    OrchestratorConfig, WorkflowRunner,
};
use growthloop_platforms::{ReqwestTwitterTransport, ReqwestYouTubeTransport};
use growthloop_reasoning::StubReasoningService;
use growthloop_store::TursoStore;
use growthloop_tasks::InMemoryTaskBroker;

pub struct Components {
    pub store: Arc<TursoStore>,
    pub broker: Arc<InMemoryTaskBroker>,
    pub workflow: Arc<WorkflowRunner>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub webhook_secret: Vec<u8>,
}

/// Opens the database per `GROWTHLOOP_DB_PATH` / `GROWTHLOOP_DB_URL`
/// (+ `GROWTHLOOP_DB_TOKEN`), falling back to an in-memory database for
/// local development.
async fn open_store() -> Result<TursoStore> {
    if let Ok(url) = std::env::var("GROWTHLOOP_DB_URL") {
        let token = std::env::var("GROWTHLOOP_DB_TOKEN").unwrap_or_default();
        return TursoStore::new_remote(&url, &token)
            .await
            .context("failed to connect to remote database");
    }
    if let Ok(path) = std::env::var("GROWTHLOOP_DB_PATH") {
        return TursoStore::new_local(&PathBuf::from(path))
            .await
            .context("failed to open local database file");
    }
    tracing::warn!("no GROWTHLOOP_DB_URL or GROWTHLOOP_DB_PATH set, using an in-memory database");
    TursoStore::new_memory().await.context("failed to open in-memory database")
}

pub async fn build_components() -> Result<Components> {
    let store = Arc::new(open_store().await?);
    let broker = Arc::new(InMemoryTaskBroker::new());
    let reasoning = Arc::new(StubReasoningService::default());

    let youtube_key = std::env::var("GROWTHLOOP_YOUTUBE_API_KEY").unwrap_or_default();
    let twitter_token = std::env::var("GROWTHLOOP_TWITTER_BEARER_TOKEN").unwrap_or_default();
    let fetcher = Arc::new(LiveCompetitorFetcher::new(
        ReqwestYouTubeTransport::new(youtube_key),
        ReqwestTwitterTransport::new(twitter_token),
    ));

    let workflow = Arc::new(WorkflowRunner::new(
        reasoning,
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        fetcher,
        Arc::new(NoopImageEnricher),
        Arc::new(NoopSeoEnricher),
        broker.clone(),
        broker.clone(),
        OrchestratorConfig::default(),
    ));

    let webhook_secret = std::env::var("GROWTHLOOP_WEBHOOK_SECRET")
        .unwrap_or_else(|_| {
            tracing::warn!("GROWTHLOOP_WEBHOOK_SECRET not set, webhook signatures will never verify");
            String::new()
        })
        .into_bytes();

    Ok(Components {
        store,
        broker,
        workflow,
        token_verifier: Arc::new(StubTokenVerifier),
        webhook_secret,
    })
}
