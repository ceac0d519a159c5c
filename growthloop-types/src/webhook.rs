//! The append-only webhook idempotency ledger (spec.md §3, §4.5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A verified, processed identity-provider event. Append-only: processing
/// the same `event_id` twice is a no-op (I7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// External event id — also the ledger's primary key.
    pub event_id: String,
    pub event_type: String,
    pub external_user_id: Option<String>,
    pub payload: serde_json::Value,
    pub processed_at: DateTime<Utc>,
}

/// The three Clerk-style user lifecycle events this ledger understands
/// (SPEC_FULL.md §3, grounded on `original_source/backend/api/webhooks.py`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEventKind {
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl WebhookEventKind {
    #[must_use]
    pub fn parse(event_type: &str) -> Option<Self> {
        match event_type {
            "user.created" => Some(Self::UserCreated),
            "user.updated" => Some(Self::UserUpdated),
            "user.deleted" => Some(Self::UserDeleted),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
        }
    }
}

/// Result of ingesting a webhook, surfaced verbatim to the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    Success,
    DuplicateSkipped,
    DuplicateRecentSkipped,
}
