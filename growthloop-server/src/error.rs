//! HTTP error mapping (spec.md §7), grounded on `vibes_server::error::ServerError`
//! except mapped to a status code here rather than left to the caller, since
//! this surface has a real taxonomy to map (`vibes-server`'s didn't).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use growthloop_types::InvalidStateTransition;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(#[from] InvalidStateTransition),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage error: {0}")]
    Store(#[from] growthloop_store::Error),

    #[error("task queue error: {0}")]
    Tasks(#[from] growthloop_tasks::Error),

    #[error("orchestrator error: {0}")]
    Orchestrator(#[from] growthloop_orchestrator::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition(_) => "invalid_state_transition",
            Self::ValidationFailed(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Forbidden => "forbidden",
            Self::Unauthorized(_) => "unauthorized",
            Self::Store(_) => "internal_error",
            Self::Tasks(_) => "internal_error",
            Self::Orchestrator(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidStateTransition(_) | Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Tasks(_) | Self::Orchestrator(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
