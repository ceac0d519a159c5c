//! Learning memory: immutable outcomes fed back into future campaigns
//! (spec.md §3, §4.6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CampaignId, MemoryId, UserId};

/// An immutable record of what worked/failed in a past campaign, keyed for
/// retrieval by `(user, goal_type, platform, niche)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningMemory {
    pub memory_id: MemoryId,
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub goal_type: String,
    pub platform: String,
    pub niche: String,
    pub campaign_duration_days: u32,
    pub posting_frequency: Option<String>,
    pub what_worked: Vec<String>,
    pub what_failed: Vec<String>,
    pub recommendations: Vec<String>,
    pub goal_achievement_summary: String,
    pub created_at: DateTime<Utc>,
}

/// Filters for retrieving past learnings. Any field left `None` is not
/// applied to the query (spec.md §4.6: "Missing filters are not applied").
#[derive(Debug, Clone, Default)]
pub struct LearningFilter {
    pub goal_type: Option<String>,
    pub platform: Option<String>,
    pub niche: Option<String>,
}

pub const LEARNING_RETRIEVAL_LIMIT: usize = 3;
