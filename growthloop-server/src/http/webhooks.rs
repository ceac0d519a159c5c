//! Identity-provider webhook ingestion (spec.md §4.5), mounted at both
//! `/auth/webhooks` and `/api/webhooks` (SPEC_FULL.md supplemental feature —
//! the original accepts only the Clerk-conventional `/api/webhooks` path;
//! this surface also answers at `/auth/webhooks` for callers that assume
//! the auth-prefixed convention).

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use growthloop_identity::verify_signature;
use growthloop_store::{UserStore, WebhookLedgerStore};
use growthloop_types::{
    Subscription, UsageMetric, User, UserId, WebhookEvent, WebhookEventKind, WebhookOutcome,
};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct ClerkEmail {
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct ClerkUserData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<ClerkEmail>,
}

pub async fn ingest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let Some(event_id) = header_str(&headers, "event_id") else {
        return (StatusCode::UNAUTHORIZED, "missing event_id header").into_response();
    };
    let Some(timestamp) = header_str(&headers, "timestamp") else {
        return (StatusCode::UNAUTHORIZED, "missing timestamp header").into_response();
    };
    let Some(signature) = header_str(&headers, "signature") else {
        return (StatusCode::UNAUTHORIZED, "missing signature header").into_response();
    };

    if verify_signature(&state.webhook_secret, timestamp, &body, signature).is_err() {
        return (StatusCode::UNAUTHORIZED, "invalid webhook signature").into_response();
    }

    let Ok(envelope) = serde_json::from_slice::<Value>(&body) else {
        return (StatusCode::BAD_REQUEST, "invalid JSON body").into_response();
    };
    let event_type = envelope
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let data = envelope.get("data").cloned().unwrap_or(Value::Null);
    let external_user_id = data.get("id").and_then(Value::as_str).map(str::to_string);

    let event = WebhookEvent {
        event_id: event_id.to_string(),
        event_type: event_type.clone(),
        external_user_id,
        payload: envelope,
        processed_at: chrono::Utc::now(),
    };

    let outcome = match state.webhooks.record_if_new(&event).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "failed to record webhook event");
            return (StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response();
        }
    };

    if outcome == WebhookOutcome::Success {
        if let Some(kind) = WebhookEventKind::parse(&event_type) {
            if let Err(e) = apply_user_mutation(&state, kind, &data).await {
                tracing::error!(error = %e, event_type = %event_type, "failed to apply webhook user mutation");
            }
        }
    }

    Json(WebhookResponse { status: outcome_label(outcome) }).into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn outcome_label(outcome: WebhookOutcome) -> &'static str {
    match outcome {
        WebhookOutcome::Success => "success",
        WebhookOutcome::DuplicateSkipped => "duplicate_skipped",
        WebhookOutcome::DuplicateRecentSkipped => "duplicate_recent_skipped",
    }
}

async fn apply_user_mutation(
    state: &AppState,
    kind: WebhookEventKind,
    data: &Value,
) -> Result<(), growthloop_store::Error> {
    let clerk_data: Option<ClerkUserData> = serde_json::from_value(data.clone()).ok();

    match kind {
        WebhookEventKind::UserCreated => {
            let Some(clerk_data) = clerk_data else {
                return Ok(());
            };
            let Some(email) = clerk_data.email_addresses.first().map(|e| e.email_address.clone())
            else {
                return Ok(());
            };
            // external_identity_id = ? OR email = ?: a user.created can arrive
            // for a row a best-effort upsert already created by email.
            let existing = match state.users.get_user_by_external_id(&clerk_data.id).await? {
                Some(user) => Some(user),
                None => state.users.get_user_by_email(&email).await?,
            };
            if let Some(mut existing) = existing {
                existing.email = email;
                existing.external_identity_id = Some(clerk_data.id);
                existing.updated_at = chrono::Utc::now();
                state.users.update_user(&existing).await?;
                return Ok(());
            }
            let now = chrono::Utc::now();
            let user = User {
                user_id: UserId::new(),
                email,
                external_identity_id: Some(clerk_data.id),
                created_at: now,
                updated_at: now,
            };
            state.users.create_user(&user).await?;
            let today = now.date_naive();
            state
                .users
                .upsert_subscription(&Subscription::free_tier(user.user_id, today))
                .await?;
            state
                .users
                .upsert_usage_metric(&UsageMetric::default_for(user.user_id))
                .await?;
        }
        WebhookEventKind::UserUpdated => {
            let Some(clerk_data) = clerk_data else {
                return Ok(());
            };
            let Some(email) = clerk_data.email_addresses.first().map(|e| e.email_address.clone())
            else {
                return Ok(());
            };
            if let Some(mut user) = state.users.get_user_by_external_id(&clerk_data.id).await? {
                user.email = email;
                user.updated_at = chrono::Utc::now();
                state.users.update_user(&user).await?;
            }
        }
        WebhookEventKind::UserDeleted => {
            let Some(external_id) = data.get("id").and_then(Value::as_str) else {
                return Ok(());
            };
            if let Some(user) = state.users.get_user_by_external_id(external_id).await? {
                state.users.delete_user(user.user_id).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use growthloop_identity::StubTokenVerifier;
    use growthloop_orchestrator::{
        enrich::{NoopImageEnricher, NoopSeoEnricher},
        fetch::{CompetitorFetcher, FetchOutcome},
        OrchestratorConfig, WorkflowRunner,
    };
    use growthloop_reasoning::StubReasoningService;
    use growthloop_store::TursoStore;
    use growthloop_tasks::InMemoryTaskBroker;
    use growthloop_types::Platform;

    struct NeverFetches;

    #[async_trait]
    impl CompetitorFetcher for NeverFetches {
        async fn fetch(&self, _platform: Platform, _competitor_url: &str) -> FetchOutcome {
            FetchOutcome::Warning("not used in these tests".to_string())
        }
    }

    async fn test_state() -> Arc<AppState> {
        let store = Arc::new(TursoStore::new_memory().await.expect("in-memory store"));
        let broker = Arc::new(InMemoryTaskBroker::new());
        let workflow = Arc::new(WorkflowRunner::new(
            Arc::new(StubReasoningService::default()),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(NeverFetches),
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

    fn clerk_user_created(id: &str, email: &str) -> Value {
        serde_json::json!({ "id": id, "email_addresses": [{ "email_address": email }] })
    }

    #[tokio::test]
    async fn user_created_provisions_a_free_tier_subscription_and_usage_metric() {
        let state = test_state().await;
        let data = clerk_user_created("ext-1", "creator@example.com");

        apply_user_mutation(&state, WebhookEventKind::UserCreated, &data).await.unwrap();

        let user = state.users.get_user_by_external_id("ext-1").await.unwrap().unwrap();
        let subscription = state.users.get_subscription(user.user_id).await.unwrap();
        let usage = state.users.get_usage_metric(user.user_id).await.unwrap();
        assert_eq!(subscription.unwrap().plan_tier, "free");
        assert_eq!(usage.unwrap().campaigns_created, 0);
    }

    #[tokio::test]
    async fn user_created_for_a_known_email_updates_external_id_instead_of_duplicating() {
        let state = test_state().await;
        let now = chrono::Utc::now();
        let existing = User {
            user_id: UserId::new(),
            email: "creator@example.com".to_string(),
            external_identity_id: None,
            created_at: now,
            updated_at: now,
        };
        state.users.create_user(&existing).await.unwrap();

        let data = clerk_user_created("ext-new", "creator@example.com");
        apply_user_mutation(&state, WebhookEventKind::UserCreated, &data).await.unwrap();

        let by_external = state.users.get_user_by_external_id("ext-new").await.unwrap().unwrap();
        assert_eq!(by_external.user_id, existing.user_id);
        assert!(state.users.get_subscription(existing.user_id).await.unwrap().is_none());
    }
}
