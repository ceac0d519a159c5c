//! Shared error taxonomy (spec.md §7).
//!
//! Every crate downstream of `growthloop-types` wraps this enum with
//! `#[from]` rather than inventing parallel variants, so the HTTP layer has
//! exactly one place to map errors to status codes.

use thiserror::Error;

use crate::status::InvalidStateTransition;

#[derive(Debug, Error)]
pub enum DomainError {
    /// 400 at the HTTP boundary; no mutation occurred.
    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidStateTransition),

    /// 400/422 for field-shape errors.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// 403 when a user attempts to access another user's resource.
    #[error("forbidden")]
    Forbidden,

    /// 401 for missing/invalid/revoked tokens or webhook signatures.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal; caught by the orchestrator, transitions the campaign to
    /// `processing_failed`.
    #[error("stage `{stage}` failed: {message}")]
    Stage {
        stage: String,
        message: String,
        retryable: bool,
    },

    /// 402/429 at the HTTP boundary.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),
}

impl DomainError {
    #[must_use]
    pub fn stage(stage: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
            retryable,
        }
    }

    /// Whether a task runtime should retry the enclosing task.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Stage { retryable: true, .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
