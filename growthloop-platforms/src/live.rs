//! `reqwest`-backed transports for the real YouTube Data API v3 and X API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;
use crate::twitter::{TweetPage, TwitterTransport};
use crate::youtube::{ChannelIdentifier, YouTubeTransport};

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const TWITTER_API_BASE: &str = "https://api.twitter.com/2";

/// Live YouTube Data API v3 transport.
pub struct ReqwestYouTubeTransport {
    client: Client,
    api_key: String,
}

impl ReqwestYouTubeTransport {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client builds with default tls config"),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl YouTubeTransport for ReqwestYouTubeTransport {
    async fn resolve_channel_id(&self, identifier: &ChannelIdentifier) -> Result<Option<String>> {
        let (param, value) = match identifier {
            ChannelIdentifier::Id(id) => return Ok(Some(id.clone())),
            ChannelIdentifier::Handle(h) => ("forHandle", h.as_str()),
            ChannelIdentifier::Username(u) => ("forUsername", u.as_str()),
        };

        let resp: Value = self
            .client
            .get(format!("{YOUTUBE_API_BASE}/channels"))
            .query(&[("part", "id"), (param, value), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(|item| item.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn search_recent_video_ids(&self, channel_id: &str, max_results: usize) -> Result<Vec<String>> {
        let resp: Value = self
            .client
            .get(format!("{YOUTUBE_API_BASE}/search"))
            .query(&[
                ("part", "id"),
                ("channelId", channel_id),
                ("order", "date"),
                ("type", "video"),
                ("maxResults", &max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ids = resp
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("id")?.get("videoId")?.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<Value>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let resp: Value = self
            .client
            .get(format!("{YOUTUBE_API_BASE}/videos"))
            .query(&[
                ("part", "snippet,statistics,contentDetails"),
                ("id", &video_ids.join(",")),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

/// Live X API v2 transport, authenticated with an app-only bearer token.
pub struct ReqwestTwitterTransport {
    client: Client,
    bearer_token: String,
}

impl ReqwestTwitterTransport {
    #[must_use]
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client builds with default tls config"),
            bearer_token: bearer_token.into(),
        }
    }
}

#[async_trait]
impl TwitterTransport for ReqwestTwitterTransport {
    async fn resolve_user_id(&self, handle_or_id: &str) -> Result<Option<String>> {
        if handle_or_id.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Some(handle_or_id.to_string()));
        }

        let resp: Value = self
            .client
            .get(format!("{TWITTER_API_BASE}/users/by/username/{handle_or_id}"))
            .bearer_auth(&self.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .get("data")
            .and_then(|d| d.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn fetch_page(&self, user_id: &str, cursor: Option<&str>) -> Result<TweetPage> {
        let mut query = vec![
            ("max_results", "100".to_string()),
            (
                "tweet.fields",
                "public_metrics,conversation_id,in_reply_to_user_id".to_string(),
            ),
        ];
        if let Some(c) = cursor {
            query.push(("pagination_token", c.to_string()));
        }

        let resp: Value = self
            .client
            .get(format!("{TWITTER_API_BASE}/users/{user_id}/tweets"))
            .bearer_auth(&self.bearer_token)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let tweets = resp
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_cursor = resp
            .get("meta")
            .and_then(|m| m.get("next_token"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(TweetPage { tweets, next_cursor })
    }
}
