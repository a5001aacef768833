//! Cycle domain events.

use crate::domain::foundation::{CycleId, DayIndex, MoodColor, Timestamp};
use serde::{Deserialize, Serialize};

/// Events that can occur during a cycle's lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CycleEvent {
    /// A new cycle was started.
    Started {
        cycle_id: CycleId,
        mood_color: MoodColor,
        started_at: Timestamp,
    },

    /// A day's answers were accepted.
    DayRecorded { cycle_id: CycleId, day: DayIndex },

    /// The seventh day was recorded.
    Completed {
        cycle_id: CycleId,
        completed_at: Timestamp,
    },
}

impl CycleEvent {
    /// Returns the cycle the event belongs to.
    pub fn cycle_id(&self) -> CycleId {
        match self {
            CycleEvent::Started { cycle_id, .. }
            | CycleEvent::DayRecorded { cycle_id, .. }
            | CycleEvent::Completed { cycle_id, .. } => *cycle_id,
        }
    }
}
