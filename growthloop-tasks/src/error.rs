use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task not found: {0}")]
    NotFound(String),

    #[error("task already terminal, cannot transition: {0}")]
    AlreadyTerminal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
