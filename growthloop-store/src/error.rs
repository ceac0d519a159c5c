//! Storage errors. `libsql`'s own error type is wrapped rather than
//! stringified so callers can still match on connection vs. query failures
//! if they need to.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid data in row: {0}")]
    InvalidData(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
