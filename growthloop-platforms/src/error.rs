//! Fetch errors. These never escape a `PlatformFetcher` call — the public
//! API always returns a [`crate::types::FetchResult`], converting failures
//! into a structured warning (spec.md §4.4 "Failure model").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("platform api error: {0}")]
    Api(String),

    #[error("could not resolve channel/handle from url: {0}")]
    UnresolvedIdentifier(String),
}

pub type Result<T> = std::result::Result<T, Error>;
