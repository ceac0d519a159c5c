//! HTTP routing, grounded on `vibes_server::http::create_router`'s flat
//! `Router::new().route(...)` shape. Unlike the teacher's single
//! all-public surface, every route but webhook ingestion is gated behind
//! [`crate::middleware::auth_middleware`].

pub mod campaigns;
pub mod onboarding;
pub mod tasks;
pub mod webhooks;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{middleware, Json, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Create the HTTP router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/api/health", get(health))
        .route("/auth/webhooks", post(webhooks::ingest))
        .route("/api/webhooks", post(webhooks::ingest));

    let protected = Router::new()
        .route("/onboarding", post(onboarding::upsert_phase1).get(onboarding::get_profile))
        .route("/profile/phase2", patch(onboarding::update_phase2))
        .route("/profile/completion", get(onboarding::completion))
        .route("/campaigns", post(campaigns::create).get(campaigns::list))
        .route("/campaigns/:campaign_id", get(campaigns::get))
        .route("/campaigns/:campaign_id/onboarding", patch(campaigns::update_onboarding))
        .route(
            "/campaigns/:campaign_id/complete-onboarding",
            post(campaigns::complete_onboarding),
        )
        .route("/campaigns/:campaign_id/start", post(campaigns::start))
        .route("/campaigns/:campaign_id/complete", post(campaigns::complete))
        .route(
            "/campaigns/:campaign_id/day/:day_number/confirm",
            patch(campaigns::confirm_day),
        )
        .route("/campaigns/:campaign_id/schedule", get(campaigns::schedule))
        .route("/campaigns/:campaign_id/report", get(campaigns::report))
        .route("/tasks/:task_id", get(tasks::get_status).delete(tasks::cancel))
        .route_layer(middleware::from_fn_with_state(state.clone(), crate::middleware::auth_middleware));

    public
        .merge(protected)
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    use async_trait::async_trait;

    use growthloop_identity::StubTokenVerifier;
    use growthloop_orchestrator::{
        enrich::{NoopImageEnricher, NoopSeoEnricher},
        fetch::{CompetitorFetcher, FetchOutcome},
        OrchestratorConfig, WorkflowRunner,
    };
    use growthloop_reasoning::StubReasoningService;
    use growthloop_store::{TursoStore, UserStore};
    use growthloop_tasks::InMemoryTaskBroker;
    use growthloop_types::{Platform, User};

    struct AlwaysWarnsFetcher;

    #[async_trait]
    impl CompetitorFetcher for AlwaysWarnsFetcher {
        async fn fetch(&self, _platform: Platform, _competitor_url: &str) -> FetchOutcome {
            FetchOutcome::Warning("test fetcher never has data".to_string())
        }
    }

    async fn test_state() -> Arc<AppState> {
        let store = Arc::new(TursoStore::new_memory().await.expect("in-memory store"));
        let broker = Arc::new(InMemoryTaskBroker::new());
        let reasoning = Arc::new(StubReasoningService::default());
        let workflow = Arc::new(WorkflowRunner::new(
            reasoning,
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(AlwaysWarnsFetcher),
            Arc::new(NoopImageEnricher),
            Arc::new(NoopSeoEnricher),
            broker.clone(),
            broker.clone(),
            OrchestratorConfig::default(),
        ));

        Arc::new(AppState::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            broker.clone(),
            broker,
            Arc::new(StubTokenVerifier),
            workflow,
            b"test-secret".to_vec(),
        ))
    }

    #[tokio::test]
    async fn health_check_is_unauthenticated() {
        let state = test_state().await;
        let server = TestServer::new(create_router(state)).unwrap();
        let response = server.get("/api/health").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_bearer_token() {
        let state = test_state().await;
        let server = TestServer::new(create_router(state)).unwrap();
        let response = server.get("/campaigns").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn campaign_created_with_a_valid_token_is_owned_by_that_user() {
        let state = test_state().await;
        let user = User {
            user_id: growthloop_types::UserId::new(),
            email: "creator@example.com".to_string(),
            external_identity_id: Some("ext-1".to_string()),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        state.users.create_user(&user).await.unwrap();

        let server = TestServer::new(create_router(state)).unwrap();
        let response = server
            .post("/campaigns")
            .add_header(
                axum::http::header::AUTHORIZATION,
                axum::http::HeaderValue::from_static("Bearer ext-1"),
            )
            .await;
        response.assert_status_ok();
        let campaign: growthloop_types::Campaign = response.json();
        assert_eq!(campaign.user_id, user.user_id);
    }
}
