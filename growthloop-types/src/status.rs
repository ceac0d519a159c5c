//! The campaign lifecycle state machine (spec.md §4.1).
//!
//! Ten states, guarded transitions. `transition` is the single place that
//! decides whether a move is legal — callers never match on `CampaignStatus`
//! to decide that for themselves.

use serde::{Deserialize, Serialize};

/// The ten campaign lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    OnboardingIncomplete,
    ReadyToStart,
    Processing,
    InProgress,
    GeneratingReport,
    Completed,
    ProcessingFailed,
    Failed,
    ArchivedPlanExpired,
    ArchivedUserDeleted,
}

impl CampaignStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnboardingIncomplete => "onboarding_incomplete",
            Self::ReadyToStart => "ready_to_start",
            Self::Processing => "processing",
            Self::InProgress => "in_progress",
            Self::GeneratingReport => "generating_report",
            Self::Completed => "completed",
            Self::ProcessingFailed => "processing_failed",
            Self::Failed => "failed",
            Self::ArchivedPlanExpired => "archived_plan_expired",
            Self::ArchivedUserDeleted => "archived_user_deleted",
        }
    }

    /// Onboarding fields may be edited/deleted only in these two states.
    #[must_use]
    pub fn onboarding_editable(&self) -> bool {
        matches!(self, Self::OnboardingIncomplete | Self::ReadyToStart)
    }
}

/// The last full-workflow phase a `processing_failed` campaign had attempted,
/// recorded so a retry resumes from the right entry point (spec.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastAttemptedPhase {
    /// Failed somewhere in the six-stage workflow; retry resumes at `processing`.
    Workflow,
    /// Failed during outcome analysis; retry resumes at `generating_report`.
    Outcome,
}

/// Why a campaign was archived. The transition table names a single
/// `archive` action but the state list carries two distinct archived states;
/// this parameter is how a caller picks which one (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveReason {
    PlanExpired,
    UserDeleted,
}

/// An action that can be applied to a campaign, one per column of the
/// transition table in spec.md §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateOnboarding,
    CompleteOnboarding,
    EnqueueWorkflow,
    WorkflowOk,
    WorkflowError,
    CompleteWithMetrics,
    OutcomeOk,
    OutcomeError,
    Retry,
    Archive(ArchiveReason),
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Self::UpdateOnboarding => "update_onboarding",
            Self::CompleteOnboarding => "complete_onboarding",
            Self::EnqueueWorkflow => "enqueue_workflow",
            Self::WorkflowOk => "workflow_ok",
            Self::WorkflowError => "workflow_error",
            Self::CompleteWithMetrics => "complete_with_metrics",
            Self::OutcomeOk => "outcome_ok",
            Self::OutcomeError => "outcome_error",
            Self::Retry => "retry",
            Self::Archive(_) => "archive",
        }
    }
}

/// Raised when an action does not have an entry in the transition table for
/// the campaign's current state (I4).
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid state transition: cannot apply `{action}` to campaign in `{from}`")]
pub struct InvalidStateTransition {
    pub from: &'static str,
    pub action: &'static str,
}

/// Apply `action` to a campaign currently in `from`, returning its next
/// state. `last_phase` is only consulted for [`Action::Retry`] from
/// `processing_failed`; it is ignored otherwise.
pub fn transition(
    from: CampaignStatus,
    action: Action,
    last_phase: Option<LastAttemptedPhase>,
) -> Result<CampaignStatus, InvalidStateTransition> {
    use Action::*;
    use CampaignStatus::*;

    let next = match (from, action) {
        (OnboardingIncomplete, UpdateOnboarding) => OnboardingIncomplete,
        (OnboardingIncomplete, CompleteOnboarding) => ReadyToStart,

        (ReadyToStart, UpdateOnboarding) => ReadyToStart,
        (ReadyToStart, EnqueueWorkflow) => Processing,
        (ReadyToStart, Archive(reason)) => archived_state(reason),

        (Processing, WorkflowOk) => InProgress,
        (Processing, WorkflowError) => ProcessingFailed,

        (InProgress, CompleteWithMetrics) => GeneratingReport,

        (GeneratingReport, OutcomeOk) => Completed,
        (GeneratingReport, OutcomeError) => ProcessingFailed,

        (ProcessingFailed, EnqueueWorkflow) => Processing,
        (ProcessingFailed, CompleteWithMetrics) => GeneratingReport,
        (ProcessingFailed, Retry) => match last_phase {
            Some(LastAttemptedPhase::Outcome) => GeneratingReport,
            Some(LastAttemptedPhase::Workflow) | None => Processing,
        },

        (Completed, Archive(reason)) => archived_state(reason),

        _ => {
            return Err(InvalidStateTransition {
                from: from.as_str(),
                action: action.label(),
            });
        }
    };

    Ok(next)
}

fn archived_state(reason: ArchiveReason) -> CampaignStatus {
    match reason {
        ArchiveReason::PlanExpired => CampaignStatus::ArchivedPlanExpired,
        ArchiveReason::UserDeleted => CampaignStatus::ArchivedUserDeleted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CampaignStatus::*;

    #[test]
    fn happy_path_through_workflow() {
        let s = transition(OnboardingIncomplete, Action::CompleteOnboarding, None).unwrap();
        assert_eq!(s, ReadyToStart);
        let s = transition(s, Action::EnqueueWorkflow, None).unwrap();
        assert_eq!(s, Processing);
        let s = transition(s, Action::WorkflowOk, None).unwrap();
        assert_eq!(s, InProgress);
        let s = transition(s, Action::CompleteWithMetrics, None).unwrap();
        assert_eq!(s, GeneratingReport);
        let s = transition(s, Action::OutcomeOk, None).unwrap();
        assert_eq!(s, Completed);
    }

    #[test]
    fn retry_resumes_workflow_by_default() {
        let s = transition(ProcessingFailed, Action::Retry, None).unwrap();
        assert_eq!(s, Processing);
        let s = transition(
            ProcessingFailed,
            Action::Retry,
            Some(LastAttemptedPhase::Workflow),
        )
        .unwrap();
        assert_eq!(s, Processing);
    }

    #[test]
    fn retry_resumes_outcome_when_recorded() {
        let s = transition(
            ProcessingFailed,
            Action::Retry,
            Some(LastAttemptedPhase::Outcome),
        )
        .unwrap();
        assert_eq!(s, GeneratingReport);
    }

    #[test]
    fn unlisted_transition_is_rejected() {
        let err = transition(OnboardingIncomplete, Action::EnqueueWorkflow, None).unwrap_err();
        assert_eq!(err.from, "onboarding_incomplete");
        assert_eq!(err.action, "enqueue_workflow");
    }

    #[test]
    fn terminal_states_reject_workflow_actions() {
        assert!(transition(Completed, Action::WorkflowOk, None).is_err());
        assert!(transition(Failed, Action::Retry, None).is_err());
        assert!(transition(ArchivedPlanExpired, Action::UpdateOnboarding, None).is_err());
    }

    #[test]
    fn archive_picks_the_named_reason() {
        let s = transition(ReadyToStart, Action::Archive(ArchiveReason::PlanExpired), None).unwrap();
        assert_eq!(s, ArchivedPlanExpired);
        let s = transition(Completed, Action::Archive(ArchiveReason::UserDeleted), None).unwrap();
        assert_eq!(s, ArchivedUserDeleted);
    }

    #[test]
    fn onboarding_editable_only_in_the_two_named_states() {
        assert!(OnboardingIncomplete.onboarding_editable());
        assert!(ReadyToStart.onboarding_editable());
        assert!(!Processing.onboarding_editable());
        assert!(!Completed.onboarding_editable());
    }

    /// Every cell of the transition table in spec.md §4.1 that is blank (`—`)
    /// must reject its action.
    #[test]
    fn exhaustive_blank_cells_are_rejected() {
        let all_states = [
            OnboardingIncomplete,
            ReadyToStart,
            Processing,
            InProgress,
            GeneratingReport,
            Completed,
            ProcessingFailed,
            Failed,
            ArchivedPlanExpired,
            ArchivedUserDeleted,
        ];
        let all_actions = [
            Action::UpdateOnboarding,
            Action::CompleteOnboarding,
            Action::EnqueueWorkflow,
            Action::WorkflowOk,
            Action::WorkflowError,
            Action::CompleteWithMetrics,
            Action::OutcomeOk,
            Action::OutcomeError,
            Action::Retry,
            Action::Archive(ArchiveReason::PlanExpired),
        ];
        let mut legal = 0;
        let mut illegal = 0;
        for state in all_states {
            for action in all_actions {
                match transition(state, action, None) {
                    Ok(_) => legal += 1,
                    Err(_) => illegal += 1,
                }
            }
        }
        // 10 states * 10 actions = 100 cells; the table names far fewer legal ones.
        assert_eq!(legal + illegal, 100);
        assert!(legal >= 13 && legal <= 16, "legal={legal}");
    }
}
