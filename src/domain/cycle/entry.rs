//! DayEntry - one submitted day's answers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CycleId, DayIndex, EntryId, Timestamp};

use super::DayInput;

/// The answers recorded for one day of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub entry_id: EntryId,
    pub cycle_id: CycleId,
    pub day_index: DayIndex,
    pub raw_input: DayInput,
    pub created_at: Timestamp,
    /// Coaching feedback shown to the user before the day was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<String>,
}

impl DayEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(cycle_id: CycleId, day_index: DayIndex, raw_input: DayInput) -> Self {
        Self {
            entry_id: EntryId::new(),
            cycle_id,
            day_index,
            raw_input,
            created_at: Timestamp::now(),
            ai_feedback: None,
        }
    }

    /// Attaches the coaching feedback the user saw.
    pub fn with_feedback(mut self, feedback: Option<String>) -> Self {
        self.ai_feedback = feedback.filter(|f| !f.trim().is_empty());
        self
    }
}
