//! Per-day content and execution records (spec.md §3).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::Platform;
use crate::ids::{CampaignId, ContentId, ExecutionId};

/// Script/title/tags/CTA for one `(campaign, day, platform)` (unique per I-spec).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyContent {
    pub content_id: ContentId,
    pub campaign_id: CampaignId,
    /// Invariant: `1 <= day_number <= 30`.
    pub day_number: u32,
    pub platform: Platform,
    pub script: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub cta: Option<String>,
    /// Populated when `platform == Twitter`.
    pub tweet_text: Option<String>,
    pub thread: Vec<String>,
    pub thumbnail_urls: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyContent {
    pub const MIN_DAY: u32 = 1;
    pub const MAX_DAY: u32 = 30;

    #[must_use]
    pub fn is_day_number_valid(day_number: u32) -> bool {
        (Self::MIN_DAY..=Self::MAX_DAY).contains(&day_number)
    }
}

/// User-confirmed posting flags and optional engagement metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyExecution {
    pub execution_id: ExecutionId,
    pub campaign_id: CampaignId,
    pub day_number: u32,
    pub platform: Platform,
    pub posted_to_youtube: bool,
    pub posted_to_twitter: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub engagement_metrics: BTreeMap<String, f64>,
}
