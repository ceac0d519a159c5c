//! Reasoning-stage failures. A real provider's own errors (rate limits,
//! malformed completions, timeouts) collapse into this shape so the
//! orchestrator only has to reason about one axis: retryable or not.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("reasoning provider error: {0}")]
    Provider(String),

    #[error("reasoning provider returned a response the caller could not use: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Whether a retry of the same stage is worth attempting.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Error::Provider(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
