//! growthloop-classify: deterministic, pure partitioning of platform content
//! into high/low traction cohorts (spec.md §4.3).
//!
//! No I/O, no `async_trait` — this is the numeric step that feeds the LLM
//! reasoning stages, and it must be reproducible given the same input.

pub mod twitter;
pub mod youtube;

pub use twitter::{classify_by_engagement, TweetMetrics, MIN_TWEETS_TO_CLASSIFY};
pub use youtube::classify_by_views;
