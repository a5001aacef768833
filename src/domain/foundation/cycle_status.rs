//! CycleStatus enum for tracking the lifecycle of a seven-day cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a cycle.
///
/// Derived from `completed_at`: a cycle is `Completed` exactly when its
/// seventh day has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    #[default]
    InProgress,
    Completed,
}

impl CycleStatus {
    /// Returns true if the cycle still accepts day entries.
    pub fn is_mutable(&self) -> bool {
        matches!(self, CycleStatus::InProgress)
    }
}

impl StateMachine for CycleStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (CycleStatus::InProgress, CycleStatus::Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            CycleStatus::InProgress => vec![CycleStatus::Completed],
            CycleStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleStatus::InProgress => "InProgress",
            CycleStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}
