//! Forensics-stage data acquisition: fetch a competitor's recent content and
//! partition it into high/low cohorts (spec.md §4.1 Forensics, §4.3, §4.4).
//! Grounded on `growthloop-platforms`' never-fails fetchers and
//! `growthloop-classify`'s pure partitioners; this is the one seam where the
//! two crates meet, kept out of `growthloop-reasoning` so that crate stays
//! agnostic to platform shape (see DESIGN.md).

use async_trait::async_trait;
use serde_json::json;

use growthloop_classify::{classify_by_engagement, classify_by_views, TweetMetrics};
use growthloop_platforms::{TwitterFetcher, TwitterTransport, YouTubeFetcher, YouTubeTransport};
use growthloop_reasoning::{ClassifiedItem, Cohort};
use growthloop_types::Platform;

const DEFAULT_VIDEO_COUNT: usize = 25;
const DEFAULT_TWEET_COUNT: usize = 20;

/// Outcome of fetching and classifying one competitor's content.
pub enum FetchOutcome {
    Classified(Vec<ClassifiedItem>),
    /// Fetch failed, or there wasn't enough signal to classify
    /// (spec.md §4.3's tweet floor). The Forensics stage logs this and
    /// moves on to the next competitor.
    Warning(String),
}

/// Per-competitor fetch + classify, one implementation per platform pair.
#[async_trait]
pub trait CompetitorFetcher: Send + Sync {
    async fn fetch(&self, platform: Platform, competitor_url: &str) -> FetchOutcome;
}

fn cohort_items(high: Vec<impl serde::Serialize>, low: Vec<impl serde::Serialize>) -> Vec<ClassifiedItem> {
    high.into_iter()
        .map(|item| ClassifiedItem {
            cohort: Cohort::High,
            content: json!(item),
        })
        .chain(low.into_iter().map(|item| ClassifiedItem {
            cohort: Cohort::Low,
            content: json!(item),
        }))
        .collect()
}

/// Live implementation wired to real `reqwest`-backed transports.
pub struct LiveCompetitorFetcher<Y: YouTubeTransport, T: TwitterTransport> {
    youtube: YouTubeFetcher<Y>,
    twitter: TwitterFetcher<T>,
}

impl<Y: YouTubeTransport, T: TwitterTransport> LiveCompetitorFetcher<Y, T> {
    pub fn new(youtube_transport: Y, twitter_transport: T) -> Self {
        Self {
            youtube: YouTubeFetcher::new(youtube_transport),
            twitter: TwitterFetcher::new(twitter_transport),
        }
    }
}

#[async_trait]
impl<Y: YouTubeTransport, T: TwitterTransport> CompetitorFetcher for LiveCompetitorFetcher<Y, T> {
    async fn fetch(&self, platform: Platform, competitor_url: &str) -> FetchOutcome {
        match platform {
            Platform::YouTube => {
                let result = self
                    .youtube
                    .fetch_recent_videos(competitor_url, DEFAULT_VIDEO_COUNT)
                    .await;
                if result.items.is_empty() {
                    let message = result
                        .warning
                        .map(|w| w.message)
                        .unwrap_or_else(|| "no videos returned".to_string());
                    return FetchOutcome::Warning(message);
                }
                let (high, low) = classify_by_views(&result.items, |v| v.views);
                FetchOutcome::Classified(cohort_items(high, low))
            }
            Platform::Twitter => {
                let result = self
                    .twitter
                    .fetch_recent_tweets(competitor_url, DEFAULT_TWEET_COUNT)
                    .await;
                if result.items.is_empty() {
                    let message = result
                        .warning
                        .map(|w| w.message)
                        .unwrap_or_else(|| "no tweets returned".to_string());
                    return FetchOutcome::Warning(message);
                }
                match classify_by_engagement(&result.items, tweet_metrics) {
                    Some((high, low)) => FetchOutcome::Classified(cohort_items(high, low)),
                    None => FetchOutcome::Warning(
                        "too few tweets to classify meaningfully".to_string(),
                    ),
                }
            }
        }
    }
}

fn tweet_metrics(tweet: &growthloop_platforms::NormalizedTweet) -> TweetMetrics {
    TweetMetrics {
        likes: tweet.like_count as f64,
        retweets: tweet.retweet_count as f64,
        replies: tweet.reply_count as f64,
        bookmarks: tweet.bookmark_count as f64,
        views: tweet.view_count as f64,
    }
}
