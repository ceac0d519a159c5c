//! Shared application state (spec.md §5: HTTP and worker share only the
//! database), grounded on `vibes_server::state::AppState`'s `Arc`-wrapped
//! component bag.

use std::sync::Arc;

use growthloop_identity::TokenVerifier;
use growthloop_orchestrator::WorkflowRunner;
use growthloop_store::{CampaignStore, ContentStore, LearningStore, UserStore, WebhookLedgerStore};
use growthloop_tasks::{TaskBroker, TaskResultStore};

/// Everything a handler needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub campaigns: Arc<dyn CampaignStore>,
    pub content: Arc<dyn ContentStore>,
    pub learning: Arc<dyn LearningStore>,
    pub users: Arc<dyn UserStore>,
    pub webhooks: Arc<dyn WebhookLedgerStore>,
    pub tasks: Arc<dyn TaskBroker>,
    pub task_results: Arc<dyn TaskResultStore>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub workflow: Arc<WorkflowRunner>,
    /// HMAC secret for the `/auth/webhooks` and `/api/webhooks` signature
    /// check (spec.md §4.5 "Signing").
    pub webhook_secret: Arc<[u8]>,
}

#[allow(clippy::too_many_arguments)]
impl AppState {
    #[must_use]
    pub fn new(
        campaigns: Arc<dyn CampaignStore>,
        content: Arc<dyn ContentStore>,
        learning: Arc<dyn LearningStore>,
        users: Arc<dyn UserStore>,
        webhooks: Arc<dyn WebhookLedgerStore>,
        tasks: Arc<dyn TaskBroker>,
        task_results: Arc<dyn TaskResultStore>,
        token_verifier: Arc<dyn TokenVerifier>,
        workflow: Arc<WorkflowRunner>,
        webhook_secret: Vec<u8>,
    ) -> Self {
        Self {
            campaigns,
            content,
            learning,
            users,
            webhooks,
            tasks,
            task_results,
            token_verifier,
            workflow,
            webhook_secret: webhook_secret.into(),
        }
    }
}
