//! Twitter/X fetching (spec.md §4.4).
//!
//! Pagination is cursor-based with a hard safety cap — providers can return
//! cursors that never terminate, and we'd rather under-fetch than loop
//! forever.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{FetchResult, NormalizedTweet};

/// Default number of recent tweets to fetch.
pub const DEFAULT_TWEET_COUNT: usize = 20;
/// Refuse to follow more than this many pagination cursors in one fetch.
pub const MAX_PAGES: usize = 10;

/// A page of tweets plus an optional cursor to the next page.
pub struct TweetPage {
    pub tweets: Vec<Value>,
    pub next_cursor: Option<String>,
}

/// The wire operations needed from the X API. A real implementation wraps
/// `reqwest::Client` + bearer token; tests use a fake.
#[async_trait]
pub trait TwitterTransport: Send + Sync {
    /// Resolve a handle to a numeric user id, once known preferred over the
    /// handle for subsequent lookups (handles can be renamed, ids cannot).
    async fn resolve_user_id(&self, handle_or_id: &str) -> Result<Option<String>>;

    /// Fetch one page of this user's recent tweets.
    async fn fetch_page(&self, user_id: &str, cursor: Option<&str>) -> Result<TweetPage>;
}

/// Fetches and normalizes recent tweets for an account.
pub struct TwitterFetcher<T: TwitterTransport> {
    transport: T,
}

impl<T: TwitterTransport> TwitterFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch up to `max_results` recent tweets for `handle_or_id`. Never
    /// returns `Err`: any failure becomes a structured warning on an empty
    /// result (spec.md §4.4).
    pub async fn fetch_recent_tweets(
        &self,
        handle_or_id: &str,
        max_results: usize,
    ) -> FetchResult<NormalizedTweet> {
        match self.fetch_recent_tweets_inner(handle_or_id, max_results).await {
            Ok(items) => FetchResult::ok(items),
            Err(e) => {
                warn!(error = %e, handle_or_id, "twitter fetch failed");
                FetchResult::empty_with_warning(e.to_string())
            }
        }
    }

    async fn fetch_recent_tweets_inner(
        &self,
        handle_or_id: &str,
        max_results: usize,
    ) -> Result<Vec<NormalizedTweet>> {
        let user_id = self
            .transport
            .resolve_user_id(handle_or_id)
            .await?
            .ok_or_else(|| Error::UnresolvedIdentifier(handle_or_id.to_string()))?;

        let mut tweets = Vec::with_capacity(max_results);
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            if tweets.len() >= max_results {
                break;
            }
            let page = self.transport.fetch_page(&user_id, cursor.as_deref()).await?;
            tweets.extend(page.tweets.iter().filter_map(parse_tweet));

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tweets.truncate(max_results);
        Ok(tweets)
    }
}

fn parse_tweet(item: &Value) -> Option<NormalizedTweet> {
    let id = item.get("id")?.as_str()?.to_string();
    let text = item.get("text")?.as_str()?.to_string();
    let metrics = item.get("public_metrics").cloned().unwrap_or_default();

    Some(NormalizedTweet {
        id,
        text,
        like_count: metrics.get("like_count").and_then(Value::as_i64).unwrap_or(0),
        retweet_count: metrics.get("retweet_count").and_then(Value::as_i64).unwrap_or(0),
        reply_count: metrics.get("reply_count").and_then(Value::as_i64).unwrap_or(0),
        view_count: metrics.get("impression_count").and_then(Value::as_i64).unwrap_or(0),
        bookmark_count: metrics.get("bookmark_count").and_then(Value::as_i64).unwrap_or(0),
        conversation_id: item.get("conversation_id").and_then(Value::as_str).map(str::to_string),
        is_reply: item.get("in_reply_to_user_id").is_some(),
        author_followers: item
            .get("author_followers")
            .and_then(Value::as_i64)
            .unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeTransport {
        user_id: Option<String>,
        pages: Mutex<Vec<TweetPage>>,
        fail: bool,
    }

    #[async_trait]
    impl TwitterTransport for FakeTransport {
        async fn resolve_user_id(&self, _handle_or_id: &str) -> Result<Option<String>> {
            Ok(self.user_id.clone())
        }

        async fn fetch_page(&self, _user_id: &str, _cursor: Option<&str>) -> Result<TweetPage> {
            if self.fail {
                return Err(Error::Api("boom".into()));
            }
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok(TweetPage { tweets: vec![], next_cursor: None });
            }
            Ok(pages.remove(0))
        }
    }

    fn sample_tweet(id: &str) -> Value {
        serde_json::json!({
            "id": id,
            "text": format!("tweet {id}"),
            "public_metrics": { "like_count": 5, "retweet_count": 1, "reply_count": 0, "impression_count": 100, "bookmark_count": 2 },
        })
    }

    #[tokio::test]
    async fn fetch_recent_tweets_normalizes_and_truncates_to_max_results() {
        let page1 = TweetPage {
            tweets: (0..15).map(|i| sample_tweet(&format!("t{i}"))).collect(),
            next_cursor: Some("cursor1".into()),
        };
        let page2 = TweetPage {
            tweets: (15..25).map(|i| sample_tweet(&format!("t{i}"))).collect(),
            next_cursor: None,
        };
        let transport = FakeTransport {
            user_id: Some("12345".into()),
            pages: Mutex::new(vec![page1, page2]),
            fail: false,
        };
        let fetcher = TwitterFetcher::new(transport);
        let result = fetcher.fetch_recent_tweets("alice", DEFAULT_TWEET_COUNT).await;
        assert!(result.warning.is_none());
        assert_eq!(result.items.len(), DEFAULT_TWEET_COUNT);
    }

    #[tokio::test]
    async fn pagination_stops_when_no_next_cursor() {
        let page1 = TweetPage {
            tweets: vec![sample_tweet("t0")],
            next_cursor: None,
        };
        let transport = FakeTransport {
            user_id: Some("12345".into()),
            pages: Mutex::new(vec![page1]),
            fail: false,
        };
        let fetcher = TwitterFetcher::new(transport);
        let result = fetcher.fetch_recent_tweets("alice", 50).await;
        assert_eq!(result.items.len(), 1);
    }

    #[tokio::test]
    async fn http_failure_becomes_empty_result_with_warning() {
        let transport = FakeTransport {
            user_id: Some("12345".into()),
            pages: Mutex::new(vec![]),
            fail: true,
        };
        let fetcher = TwitterFetcher::new(transport);
        let result = fetcher.fetch_recent_tweets("alice", 20).await;
        assert!(result.items.is_empty());
        assert!(result.warning.is_some());
    }

    #[tokio::test]
    async fn unresolvable_handle_becomes_warning_not_panic() {
        let transport = FakeTransport {
            user_id: None,
            pages: Mutex::new(vec![]),
            fail: false,
        };
        let fetcher = TwitterFetcher::new(transport);
        let result = fetcher.fetch_recent_tweets("ghost", 20).await;
        assert!(result.items.is_empty());
        assert!(result.warning.is_some());
    }
}
