// Run state model for Cadence Workflows
//
// This module defines the phase enum published to observers during a run,
// the update stream item type, and the summary emitted when a run ends.
// Only the engine's sequencing task produces these values; mutations are
// strictly serialized, so a snapshot is always internally consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::serde_helpers::duration_serde;

use super::types::TimedStep;

/// What is happening right now in a run.
///
/// A sealed set of phases with phase-specific payloads. Observers are
/// expected to match exhaustively; adding a phase is a breaking change by
/// design, never absorbed by a wildcard arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum RunPhase {
    /// No run is active
    Idle,
    /// A step countdown is ticking
    Running {
        /// Step currently counting down
        step: TimedStep,
        /// The step that follows, if any
        next_step: Option<TimedStep>,
        /// Position of the current step in the sequence
        step_index: usize,
        /// Total number of steps in the workflow
        step_count: usize,
        /// Seconds left in the current step
        remaining_seconds: u32,
        /// Full duration of the current step
        total_seconds: u32,
    },
    /// The countdown is frozen awaiting resume or stop
    Paused {
        /// Step whose countdown is frozen
        step: TimedStep,
        /// Position of the current step in the sequence
        step_index: usize,
        /// Total number of steps in the workflow
        step_count: usize,
        /// Frozen remaining seconds, unchanged until resume
        remaining_seconds: u32,
        /// Full duration of the current step
        total_seconds: u32,
    },
    /// The inter-step alert phase is counting down
    Resting {
        /// Step that just finished
        completed_step: TimedStep,
        /// Position of the completed step in the sequence
        step_index: usize,
        /// Total number of steps in the workflow
        step_count: usize,
        /// Seconds left in the rest period
        remaining_seconds: u32,
        /// Full duration of the rest period
        total_seconds: u32,
    },
    /// Terminal phase; no further mutation occurs
    Completed,
}

impl RunPhase {
    /// Index of the step the run is currently on, `None` before the first
    /// step starts and after the run ends
    pub fn current_step_index(&self) -> Option<usize> {
        match self {
            RunPhase::Idle | RunPhase::Completed => None,
            RunPhase::Running { step_index, .. }
            | RunPhase::Paused { step_index, .. }
            | RunPhase::Resting { step_index, .. } => Some(*step_index),
        }
    }

    /// Seconds remaining in the active countdown, zero outside one
    pub fn remaining_seconds(&self) -> u32 {
        match self {
            RunPhase::Idle | RunPhase::Completed => 0,
            RunPhase::Running {
                remaining_seconds, ..
            }
            | RunPhase::Paused {
                remaining_seconds, ..
            }
            | RunPhase::Resting {
                remaining_seconds, ..
            } => *remaining_seconds,
        }
    }

    /// Denominator for the progress fraction of the current phase
    pub fn total_seconds_for_phase(&self) -> u32 {
        match self {
            RunPhase::Idle | RunPhase::Completed => 0,
            RunPhase::Running { total_seconds, .. }
            | RunPhase::Paused { total_seconds, .. }
            | RunPhase::Resting { total_seconds, .. } => *total_seconds,
        }
    }

    /// Whether the phase is one of the two terminal-or-idle states
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Idle | RunPhase::Completed)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// The step sequence ran out naturally
    Completed,
    /// `stop()` cancelled the run
    Stopped,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier assigned when the run started
    pub run_id: Uuid,
    /// Name of the workflow that ran
    pub workflow_name: String,
    /// Steps whose countdown and rest phase both finished
    pub steps_completed: usize,
    /// Total number of steps in the workflow
    pub total_steps: usize,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run
    pub ended_at: DateTime<Utc>,
    /// Total wall-clock duration
    #[serde(with = "duration_serde")]
    pub duration: chrono::Duration,
}

/// Update message delivered to subscribers.
///
/// Snapshots carry the run state; the `Ended` variant is the distinct
/// terminal signal and is not a snapshot. After `stop()` no further
/// snapshots are published, only the final `Ended`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "update", rename_all = "kebab-case")]
pub enum RunUpdate {
    /// One immutable observation of the run state
    Snapshot(RunPhase),
    /// The run ended; exactly one per run
    Ended {
        /// Natural completion vs explicit stop
        reason: EndReason,
        /// Final accounting for the run
        summary: RunSummary,
    },
}

impl RunUpdate {
    /// The snapshot payload, if this update is one
    pub fn as_snapshot(&self) -> Option<&RunPhase> {
        match self {
            RunUpdate::Snapshot(phase) => Some(phase),
            RunUpdate::Ended { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_phase(remaining: u32) -> RunPhase {
        RunPhase::Running {
            step: TimedStep::new("Stretch", 30),
            next_step: None,
            step_index: 2,
            step_count: 3,
            remaining_seconds: remaining,
            total_seconds: 30,
        }
    }

    #[test]
    fn test_flat_accessors() {
        let phase = running_phase(12);
        assert_eq!(phase.current_step_index(), Some(2));
        assert_eq!(phase.remaining_seconds(), 12);
        assert_eq!(phase.total_seconds_for_phase(), 30);
        assert!(!phase.is_terminal());
    }

    #[test]
    fn test_idle_and_completed_have_no_step_index() {
        assert_eq!(RunPhase::Idle.current_step_index(), None);
        assert_eq!(RunPhase::Completed.current_step_index(), None);
        assert!(RunPhase::Idle.is_terminal());
        assert!(RunPhase::Completed.is_terminal());
    }

    #[test]
    fn test_phase_serializes_with_tag() {
        let json = serde_json::to_value(running_phase(5)).unwrap();
        assert_eq!(json["phase"], "running");
        assert_eq!(json["remaining_seconds"], 5);

        let round_trip: RunPhase = serde_json::from_value(json).unwrap();
        assert_eq!(round_trip, running_phase(5));
    }

    #[test]
    fn test_update_as_snapshot() {
        let update = RunUpdate::Snapshot(RunPhase::Completed);
        assert_eq!(update.as_snapshot(), Some(&RunPhase::Completed));

        let now = Utc::now();
        let ended = RunUpdate::Ended {
            reason: EndReason::Stopped,
            summary: RunSummary {
                run_id: Uuid::new_v4(),
                workflow_name: "Morning Routine".to_string(),
                steps_completed: 1,
                total_steps: 3,
                started_at: now,
                ended_at: now,
                duration: chrono::Duration::zero(),
            },
        };
        assert!(ended.as_snapshot().is_none());
    }
}
