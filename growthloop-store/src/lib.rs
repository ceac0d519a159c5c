//! growthloop-store: libSQL-backed persistence for users, campaigns,
//! content, learnings, and the webhook ledger (spec.md components C4/C5/C6).

pub mod error;
pub mod schema;
pub mod traits;
pub mod turso;

pub use error::{Error, Result};
pub use traits::{CampaignStore, ContentStore, LearningStore, UserStore, WebhookLedgerStore};
pub use turso::TursoStore;
