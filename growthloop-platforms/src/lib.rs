//! growthloop-platforms: normalized YouTube and Twitter/X fetchers for the
//! forensics stage (spec.md §4.4).
//!
//! Every public fetch call returns a [`types::FetchResult`] rather than a
//! `Result` — HTTP failures degrade to an empty list plus a warning so the
//! orchestrator can proceed with partial forensics rather than fail a whole
//! campaign over one flaky provider call.

pub mod error;
pub mod live;
pub mod twitter;
pub mod types;
pub mod youtube;

pub use error::{Error, Result};
pub use twitter::{TwitterFetcher, TwitterTransport, DEFAULT_TWEET_COUNT};
pub use types::{FetchResult, FetchWarning, NormalizedTweet, NormalizedVideo};
pub use youtube::{ChannelIdentifier, YouTubeFetcher, YouTubeTransport, DEFAULT_VIDEO_COUNT};
