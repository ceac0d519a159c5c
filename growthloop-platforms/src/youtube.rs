//! YouTube Data API v3 fetching (spec.md §4.4).
//!
//! The actual HTTP calls go through [`YouTubeTransport`] so tests can inject
//! a fake and exercise channel resolution, duration parsing, and the
//! fetch-then-normalize pipeline without network access — the same seam the
//! teacher uses for `ReasoningService`/model providers.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{FetchResult, NormalizedVideo};

/// Default number of recent videos to fetch per channel.
pub const DEFAULT_VIDEO_COUNT: usize = 8;
/// The API's hard cap on ids per `videos.list` call.
pub const MAX_IDS_PER_CALL: usize = 50;
/// Descriptions are truncated to this many characters before being handed
/// to the classifier.
pub const DESCRIPTION_TRUNCATE_LEN: usize = 800;

/// A resolved reference to a channel, before it has been turned into a
/// channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelIdentifier {
    Id(String),
    Handle(String),
    Username(String),
}

static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/channel/([a-zA-Z0-9_-]+)").unwrap());
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/@([a-zA-Z0-9_-]+)").unwrap());
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/(?:c|user)/([a-zA-Z0-9_-]+)").unwrap());

/// Pattern-match a channel URL into one of the three identifier shapes
/// (spec.md §4.4: `/channel/UC…`, `/@handle`, `/c/name`, `/user/name`).
#[must_use]
pub fn extract_channel_identifier(url: &str) -> Option<ChannelIdentifier> {
    if let Some(caps) = CHANNEL_ID_RE.captures(url) {
        return Some(ChannelIdentifier::Id(caps[1].to_string()));
    }
    if let Some(caps) = HANDLE_RE.captures(url) {
        return Some(ChannelIdentifier::Handle(caps[1].to_string()));
    }
    if let Some(caps) = USERNAME_RE.captures(url) {
        return Some(ChannelIdentifier::Username(caps[1].to_string()));
    }
    None
}

/// Parse an ISO-8601 duration (`PT<h>H<m>M<s>S`) into whole seconds.
/// Missing components are treated as zero; an unparsable string yields 0.
#[must_use]
pub fn parse_iso8601_duration(input: &str) -> u64 {
    static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap()
    });

    let Some(caps) = DURATION_RE.captures(input) else {
        return 0;
    };
    let hours: u64 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let minutes: u64 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    let seconds: u64 = caps.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);

    hours * 3600 + minutes * 60 + seconds
}

/// The wire operations needed from the YouTube Data API. A real
/// implementation wraps `reqwest::Client` + an API key; tests use a fake.
#[async_trait]
pub trait YouTubeTransport: Send + Sync {
    /// Resolve an identifier to a channel id (`UC...`), or `None` if no
    /// matching channel was found.
    async fn resolve_channel_id(&self, identifier: &ChannelIdentifier) -> Result<Option<String>>;

    /// The most recent video ids for a channel, newest first.
    async fn search_recent_video_ids(&self, channel_id: &str, max_results: usize) -> Result<Vec<String>>;

    /// Full video metadata for up to [`MAX_IDS_PER_CALL`] ids at a time.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<Value>>;
}

/// Fetches and normalizes recent videos for a channel.
pub struct YouTubeFetcher<T: YouTubeTransport> {
    transport: T,
}

impl<T: YouTubeTransport> YouTubeFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Resolve `channel_url`, fetch its `max_results` most recent videos,
    /// and normalize them. Never returns `Err`: any failure becomes a
    /// structured warning on an empty result (spec.md §4.4).
    pub async fn fetch_recent_videos(
        &self,
        channel_url: &str,
        max_results: usize,
    ) -> FetchResult<NormalizedVideo> {
        match self.fetch_recent_videos_inner(channel_url, max_results).await {
            Ok(items) => FetchResult::ok(items),
            Err(e) => {
                warn!(error = %e, channel_url, "youtube fetch failed");
                FetchResult::empty_with_warning(e.to_string())
            }
        }
    }

    async fn fetch_recent_videos_inner(
        &self,
        channel_url: &str,
        max_results: usize,
    ) -> Result<Vec<NormalizedVideo>> {
        let identifier = extract_channel_identifier(channel_url)
            .ok_or_else(|| Error::UnresolvedIdentifier(channel_url.to_string()))?;

        let channel_id = self
            .transport
            .resolve_channel_id(&identifier)
            .await?
            .ok_or_else(|| Error::Api(format!("no channel found for {channel_url}")))?;

        let capped = max_results.min(MAX_IDS_PER_CALL);
        let video_ids = self.transport.search_recent_video_ids(&channel_id, capped).await?;
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut videos = Vec::with_capacity(video_ids.len());
        for chunk in video_ids.chunks(MAX_IDS_PER_CALL) {
            let raw = self.transport.video_details(chunk).await?;
            videos.extend(raw.iter().filter_map(parse_video));
        }
        Ok(videos)
    }
}

fn parse_video(item: &Value) -> Option<NormalizedVideo> {
    let video_id = item.get("id")?.as_str()?.to_string();
    let snippet = item.get("snippet")?;
    let statistics = item.get("statistics").cloned().unwrap_or_default();
    let content_details = item.get("contentDetails").cloned().unwrap_or_default();

    let full_description = snippet
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");
    let description: String = full_description.chars().take(DESCRIPTION_TRUNCATE_LEN).collect();

    let duration_str = content_details.get("duration").and_then(Value::as_str).unwrap_or("");

    Some(NormalizedVideo {
        video_id: video_id.clone(),
        title: snippet
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        description,
        published_at: snippet
            .get("publishedAt")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok()),
        views: statistics.get("viewCount").and_then(Value::as_str).and_then(|s| s.parse().ok()),
        likes: statistics.get("likeCount").and_then(Value::as_str).and_then(|s| s.parse().ok()),
        comments: statistics
            .get("commentCount")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok()),
        duration_seconds: Some(parse_iso8601_duration(duration_str)),
        thumbnail: snippet
            .get("thumbnails")
            .and_then(|t| t.get("high"))
            .and_then(|t| t.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
        url: format!("https://www.youtube.com/watch?v={video_id}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[test]
    fn identifier_extraction_covers_all_four_shapes() {
        assert_eq!(
            extract_channel_identifier("https://youtube.com/channel/UC123abc"),
            Some(ChannelIdentifier::Id("UC123abc".into()))
        );
        assert_eq!(
            extract_channel_identifier("https://www.youtube.com/@alice"),
            Some(ChannelIdentifier::Handle("alice".into()))
        );
        assert_eq!(
            extract_channel_identifier("https://youtube.com/c/alicechannel"),
            Some(ChannelIdentifier::Username("alicechannel".into()))
        );
        assert_eq!(
            extract_channel_identifier("https://youtube.com/user/alice99"),
            Some(ChannelIdentifier::Username("alice99".into()))
        );
        assert_eq!(extract_channel_identifier("https://example.com/nope"), None);
    }

    #[test]
    fn duration_parsing_handles_all_components() {
        assert_eq!(parse_iso8601_duration("PT1H2M10S"), 3730);
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("PT5M"), 300);
        assert_eq!(parse_iso8601_duration("PT2H"), 7200);
        assert_eq!(parse_iso8601_duration("garbage"), 0);
    }

    struct FakeTransport {
        channel_id: Option<String>,
        video_ids: Vec<String>,
        details: Mutex<HashMap<String, Value>>,
        fail_details: bool,
    }

    #[async_trait]
    impl YouTubeTransport for FakeTransport {
        async fn resolve_channel_id(&self, _identifier: &ChannelIdentifier) -> Result<Option<String>> {
            Ok(self.channel_id.clone())
        }

        async fn search_recent_video_ids(&self, _channel_id: &str, max_results: usize) -> Result<Vec<String>> {
            Ok(self.video_ids.iter().take(max_results).cloned().collect())
        }

        async fn video_details(&self, video_ids: &[String]) -> Result<Vec<Value>> {
            if self.fail_details {
                return Err(Error::Api("boom".into()));
            }
            let details = self.details.lock().unwrap();
            Ok(video_ids.iter().filter_map(|id| details.get(id).cloned()).collect())
        }
    }

    fn sample_video_json(id: &str, views: &str) -> Value {
        serde_json::json!({
            "id": id,
            "snippet": {
                "title": format!("Video {id}"),
                "description": "x".repeat(900),
                "publishedAt": "2026-01-01T00:00:00Z",
            },
            "statistics": { "viewCount": views, "likeCount": "10", "commentCount": "2" },
            "contentDetails": { "duration": "PT3M20S" },
        })
    }

    #[tokio::test]
    async fn fetch_recent_videos_normalizes_and_truncates_description() {
        let mut details = HashMap::new();
        details.insert("v1".to_string(), sample_video_json("v1", "1000"));
        let transport = FakeTransport {
            channel_id: Some("UCabc".into()),
            video_ids: vec!["v1".into()],
            details: Mutex::new(details),
            fail_details: false,
        };
        let fetcher = YouTubeFetcher::new(transport);
        let result = fetcher
            .fetch_recent_videos("https://youtube.com/@alice", DEFAULT_VIDEO_COUNT)
            .await;
        assert!(result.warning.is_none());
        assert_eq!(result.items.len(), 1);
        let v = &result.items[0];
        assert_eq!(v.views, Some(1000));
        assert_eq!(v.description.len(), DESCRIPTION_TRUNCATE_LEN);
        assert_eq!(v.duration_seconds, Some(200));
    }

    #[tokio::test]
    async fn http_failure_becomes_empty_result_with_warning() {
        let transport = FakeTransport {
            channel_id: Some("UCabc".into()),
            video_ids: vec!["v1".into()],
            details: Mutex::new(HashMap::new()),
            fail_details: true,
        };
        let fetcher = YouTubeFetcher::new(transport);
        let result = fetcher.fetch_recent_videos("https://youtube.com/@alice", 8).await;
        assert!(result.items.is_empty());
        assert!(result.warning.is_some());
    }

    #[tokio::test]
    async fn unresolvable_url_becomes_warning_not_panic() {
        let transport = FakeTransport {
            channel_id: None,
            video_ids: vec![],
            details: Mutex::new(HashMap::new()),
            fail_details: false,
        };
        let fetcher = YouTubeFetcher::new(transport);
        let result = fetcher.fetch_recent_videos("https://example.com/nope", 8).await;
        assert!(result.items.is_empty());
        assert!(result.warning.is_some());
    }
}
