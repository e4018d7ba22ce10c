//! Downstream state machines shared with the triage worker.
//!
//! The gateway never drives these transitions; it only guarantees that every
//! published event carries the `event_id`/`delivery_id` pair the worker's
//! tables join on. The enums here are the single definition of which state
//! strings and transitions are legal, mirroring the CHECK constraints in the
//! schema.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Lifecycle of applying a triage decision back to GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    /// Decision recorded, patch not yet attempted
    Decided,
    /// Patch applied to the GitHub issue
    Applied,
    /// Patch failed; eligible for another attempt
    FailedRetry,
    /// Patch skipped because the issue was already handled
    SkippedDuplicate,
}

impl PatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchState::Decided => "DECIDED",
            PatchState::Applied => "APPLIED",
            PatchState::FailedRetry => "FAILED_RETRY",
            PatchState::SkippedDuplicate => "SKIPPED_DUPLICATE",
        }
    }

    /// Whether moving to `next` is a legal transition.
    ///
    /// `FAILED_RETRY` is the retryable state and may be re-entered;
    /// `APPLIED` and `SKIPPED_DUPLICATE` are terminal.
    pub fn can_transition_to(&self, next: PatchState) -> bool {
        matches!(
            (self, next),
            (
                PatchState::Decided | PatchState::FailedRetry,
                PatchState::Applied | PatchState::FailedRetry | PatchState::SkippedDuplicate
            )
        )
    }
}

impl fmt::Display for PatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replay lifecycle of a dead-letter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlqStatus {
    /// Downstream processing failed; record parked
    Failed,
    /// An operator requested a replay
    ReplayRequested,
    /// Replay completed successfully
    ReplaySucceeded,
    /// Replay failed; may be requested again
    ReplayFailed,
}

impl DlqStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DlqStatus::Failed => "FAILED",
            DlqStatus::ReplayRequested => "REPLAY_REQUESTED",
            DlqStatus::ReplaySucceeded => "REPLAY_SUCCEEDED",
            DlqStatus::ReplayFailed => "REPLAY_FAILED",
        }
    }

    /// Whether moving to `next` is a legal transition.
    ///
    /// `REPLAY_SUCCEEDED` is terminal; a failed replay may be re-requested.
    pub fn can_transition_to(&self, next: DlqStatus) -> bool {
        matches!(
            (self, next),
            (DlqStatus::Failed, DlqStatus::ReplayRequested)
                | (
                    DlqStatus::ReplayRequested,
                    DlqStatus::ReplaySucceeded | DlqStatus::ReplayFailed
                )
                | (DlqStatus::ReplayFailed, DlqStatus::ReplayRequested)
        )
    }
}

impl fmt::Display for DlqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state string outside the schema's CHECK constraint.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown state value: {0}")]
pub struct UnknownState(pub String);

impl FromStr for PatchState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DECIDED" => Ok(PatchState::Decided),
            "APPLIED" => Ok(PatchState::Applied),
            "FAILED_RETRY" => Ok(PatchState::FailedRetry),
            "SKIPPED_DUPLICATE" => Ok(PatchState::SkippedDuplicate),
            other => Err(UnknownState(other.to_string())),
        }
    }
}

impl FromStr for DlqStatus {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAILED" => Ok(DlqStatus::Failed),
            "REPLAY_REQUESTED" => Ok(DlqStatus::ReplayRequested),
            "REPLAY_SUCCEEDED" => Ok(DlqStatus::ReplaySucceeded),
            "REPLAY_FAILED" => Ok(DlqStatus::ReplayFailed),
            other => Err(UnknownState(other.to_string())),
        }
    }
}
