//! Normalized, platform-agnostic records returned by a fetch (spec.md §4.4).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized YouTube video record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedVideo {
    pub video_id: String,
    pub title: String,
    /// Truncated to 800 characters; the full description is fetched but not
    /// passed on to the classifier (spec.md §4.4).
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub duration_seconds: Option<u64>,
    pub thumbnail: Option<String>,
    pub url: String,
}

/// A normalized tweet record. Numeric fields default to 0 when the provider
/// omits them (spec.md §4.4).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NormalizedTweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub retweet_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub bookmark_count: i64,
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub is_reply: bool,
    #[serde(default)]
    pub author_followers: i64,
}

/// Attached to a [`FetchResult`] when an HTTP failure occurred; the caller
/// (the orchestrator) decides whether partial data is acceptable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchWarning {
    pub message: String,
}

impl FetchWarning {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The result of a fetch: items collected so far (possibly partial) plus an
/// optional warning describing what went wrong, if anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult<T> {
    pub items: Vec<T>,
    pub warning: Option<FetchWarning>,
}

impl<T> FetchResult<T> {
    #[must_use]
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            warning: None,
        }
    }

    #[must_use]
    pub fn empty_with_warning(warning: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            warning: Some(FetchWarning::new(warning)),
        }
    }
}
