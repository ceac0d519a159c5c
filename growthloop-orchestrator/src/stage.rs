//! The six workflow stages as data, not control flow (spec.md §4.1, §9
//! "exceptions-for-control-flow" redesign flag).

pub use crate::error::StageError;

/// One of the six ordered stages of `processing` plus the separate
/// `Outcome` stage run under `generating_report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Context,
    Strategy,
    Forensics,
    Planner,
    Content,
    Outcome,
}

impl Stage {
    /// Progress percentage reached once this stage completes (spec.md §4.1).
    #[must_use]
    pub fn progress_after(self) -> u8 {
        match self {
            Stage::Context => 16,
            Stage::Strategy => 33,
            Stage::Forensics => 50,
            Stage::Planner => 66,
            Stage::Content => 100,
            Stage::Outcome => 100,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Context => "context",
            Stage::Strategy => "strategy",
            Stage::Forensics => "forensics",
            Stage::Planner => "planner",
            Stage::Content => "content",
            Stage::Outcome => "outcome",
        }
    }
}

pub type StageResult<T> = Result<T, StageError>;
