use thiserror::Error;

use growthloop_types::InvalidStateTransition;

/// A stage failure, carrying whether the task runtime should retry it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StageError {
    pub message: String,
    pub retryable: bool,
    /// Set only by [`StageError::cancelled_at`] — distinguishes a cooperative
    /// cancellation from an ordinary stage failure so the caller can report
    /// `Revoked` instead of `Failure` (spec.md §5 cancellation).
    pub cancelled: bool,
    /// Progress percentage reached by the last stage that completed before
    /// cancellation was observed.
    pub progress: u8,
}

impl StageError {
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
            cancelled: false,
            progress: 0,
        }
    }

    #[must_use]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
            cancelled: false,
            progress: 0,
        }
    }

    #[must_use]
    pub fn cancelled_at(progress: u8) -> Self {
        Self {
            message: "cancelled by caller".to_string(),
            retryable: false,
            cancelled: true,
            progress,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidStateTransition),

    #[error("stage failed: {0}")]
    Stage(#[from] StageError),

    #[error(transparent)]
    Store(#[from] growthloop_store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
