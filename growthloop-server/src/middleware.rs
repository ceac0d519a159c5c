//! Bearer-token authentication (spec.md §7 "Unauthorized"), grounded on
//! `vibes_server::middleware::auth::auth_middleware`'s extract-validate-attach
//! shape. This surface has no localhost bypass: every route but the webhook
//! ingestion path requires a verified identity.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use growthloop_identity::TokenVerifier;
use growthloop_store::UserStore;
use growthloop_types::UserId;

use crate::state::AppState;

/// The caller's resolved identity, attached to request extensions by
/// [`auth_middleware`] and pulled out with `Extension<AuthContext>` in
/// handlers that need to know who is asking.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: UserId,
}

fn extract_bearer(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = extract_bearer(&request) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let identity = state
        .token_verifier
        .verify(token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = state
        .users
        .get_user_by_external_id(&identity.external_identity_id)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request
        .extensions_mut()
        .insert(AuthContext { user_id: user.user_id });

    Ok(next.run(request).await)
}
