//! Table DDL. JSONB-typed columns (spec.md invariant I8) are `TEXT` holding
//! serialized JSON that always round-trips through a typed Rust struct at
//! the row-(re)construction boundary in `turso.rs` — never passed through
//! as bare `serde_json::Value` beyond that function.

pub const SCHEMA_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    external_identity_id TEXT UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

pub const SCHEMA_CREATOR_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS creator_profiles (
    user_id TEXT PRIMARY KEY REFERENCES users(user_id) ON DELETE CASCADE,
    data TEXT NOT NULL
)
"#;

pub const SCHEMA_SUBSCRIPTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    subscription_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    data TEXT NOT NULL
)
"#;

pub const SCHEMA_USAGE_METRICS: &str = r#"
CREATE TABLE IF NOT EXISTS usage_metrics (
    user_id TEXT PRIMARY KEY REFERENCES users(user_id) ON DELETE CASCADE,
    data TEXT NOT NULL
)
"#;

pub const SCHEMA_CAMPAIGNS: &str = r#"
CREATE TABLE IF NOT EXISTS campaigns (
    campaign_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    status TEXT NOT NULL,
    task_id TEXT,
    last_attempted_phase TEXT,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

pub const INDEX_CAMPAIGNS_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_campaigns_user ON campaigns(user_id)";

pub const SCHEMA_DAILY_CONTENT: &str = r#"
CREATE TABLE IF NOT EXISTS daily_content (
    content_id TEXT PRIMARY KEY,
    campaign_id TEXT NOT NULL REFERENCES campaigns(campaign_id) ON DELETE CASCADE,
    day_number INTEGER NOT NULL,
    platform TEXT NOT NULL,
    data TEXT NOT NULL,
    UNIQUE(campaign_id, day_number, platform)
)
"#;

pub const SCHEMA_DAILY_EXECUTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS daily_executions (
    execution_id TEXT PRIMARY KEY,
    campaign_id TEXT NOT NULL REFERENCES campaigns(campaign_id) ON DELETE CASCADE,
    day_number INTEGER NOT NULL,
    platform TEXT NOT NULL,
    data TEXT NOT NULL,
    UNIQUE(campaign_id, day_number, platform)
)
"#;

pub const SCHEMA_LEARNING_MEMORIES: &str = r#"
CREATE TABLE IF NOT EXISTS learning_memories (
    memory_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    campaign_id TEXT NOT NULL UNIQUE,
    goal_type TEXT NOT NULL,
    platform TEXT NOT NULL,
    niche TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

pub const INDEX_LEARNING_FILTER: &str =
    "CREATE INDEX IF NOT EXISTS idx_learning_filter ON learning_memories(goal_type, platform, niche, created_at)";

pub const SCHEMA_WEBHOOK_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS webhook_events (
    event_id TEXT PRIMARY KEY,
    event_type TEXT NOT NULL,
    external_user_id TEXT NOT NULL,
    payload TEXT NOT NULL,
    processed_at TEXT NOT NULL
)
"#;

pub const INDEX_WEBHOOK_DEDUP: &str =
    "CREATE INDEX IF NOT EXISTS idx_webhook_dedup ON webhook_events(external_user_id, event_type, processed_at)";

pub const ALL_SCHEMA_STATEMENTS: &[&str] = &[
    SCHEMA_USERS,
    SCHEMA_CREATOR_PROFILES,
    SCHEMA_SUBSCRIPTIONS,
    SCHEMA_USAGE_METRICS,
    SCHEMA_CAMPAIGNS,
    INDEX_CAMPAIGNS_USER,
    SCHEMA_DAILY_CONTENT,
    SCHEMA_DAILY_EXECUTIONS,
    SCHEMA_LEARNING_MEMORIES,
    INDEX_LEARNING_FILTER,
    SCHEMA_WEBHOOK_EVENTS,
    INDEX_WEBHOOK_DEDUP,
];
