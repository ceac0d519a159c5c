//! Errors raised verifying inbound webhooks or request tokens.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing signature header")]
    MissingSignature,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("timestamp header is missing or not a valid integer")]
    InvalidTimestamp,

    #[error("no authentication token provided")]
    MissingToken,

    #[error("token verification failed: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, Error>;
