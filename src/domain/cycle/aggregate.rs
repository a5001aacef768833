//! Cycle aggregate - The root entity for one seven-day journey.
//!
//! A Cycle moves through days 1 to 7 strictly in order. Recording the
//! seventh day completes it; a completed cycle never accepts another day.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CycleId, CycleStatus, DayIndex, DomainError, ErrorCode, MoodColor, StateMachine, Timestamp,
    UserId, ValidationError,
};

use super::CycleEvent;

/// The persisted shape of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub cycle_id: CycleId,
    pub user_id: UserId,
    pub topic: String,
    pub mood_color: MoodColor,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub current_day: DayIndex,
}

/// The Cycle aggregate root.
#[derive(Debug, Clone)]
pub struct Cycle {
    id: CycleId,
    user_id: UserId,
    topic: String,
    mood_color: MoodColor,
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
    current_day: DayIndex,
    domain_events: Vec<CycleEvent>,
}

impl Cycle {
    /// Starts a new cycle at day 1.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the topic is blank.
    pub fn new(
        topic: impl Into<String>,
        mood_color: MoodColor,
        user_id: UserId,
    ) -> Result<Self, ValidationError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(ValidationError::empty_field("topic"));
        }

        let id = CycleId::new();
        let now = Timestamp::now();

        let mut cycle = Self {
            id,
            user_id,
            topic,
            mood_color,
            started_at: now,
            completed_at: None,
            current_day: DayIndex::first(),
            domain_events: Vec::new(),
        };

        cycle.record_event(CycleEvent::Started {
            cycle_id: id,
            mood_color,
            started_at: now,
        });

        Ok(cycle)
    }

    /// Reconstitutes a cycle from persisted data.
    ///
    /// Bypasses event recording. Fails with `CorruptRecord` when the data
    /// breaks the cycle's invariants.
    pub fn reconstitute(snapshot: CycleSnapshot) -> Result<Self, DomainError> {
        if snapshot.topic.trim().is_empty() {
            return Err(DomainError::new(
                ErrorCode::CorruptRecord,
                "Persisted cycle has an empty topic",
            )
            .with_detail("cycle_id", snapshot.cycle_id.to_string()));
        }

        if snapshot.completed_at.is_some() && !snapshot.current_day.is_last() {
            return Err(DomainError::new(
                ErrorCode::CorruptRecord,
                format!(
                    "Persisted cycle is completed but stopped at {}",
                    snapshot.current_day
                ),
            )
            .with_detail("cycle_id", snapshot.cycle_id.to_string()));
        }

        if let Some(completed_at) = snapshot.completed_at {
            if completed_at.is_before(&snapshot.started_at) {
                return Err(DomainError::new(
                    ErrorCode::CorruptRecord,
                    "Persisted cycle was completed before it started",
                )
                .with_detail("cycle_id", snapshot.cycle_id.to_string()));
            }
        }

        Ok(Self {
            id: snapshot.cycle_id,
            user_id: snapshot.user_id,
            topic: snapshot.topic,
            mood_color: snapshot.mood_color,
            started_at: snapshot.started_at,
            completed_at: snapshot.completed_at,
            current_day: snapshot.current_day,
            domain_events: Vec::new(),
        })
    }

    /// Returns the persisted shape of this cycle.
    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            cycle_id: self.id,
            user_id: self.user_id.clone(),
            topic: self.topic.clone(),
            mood_color: self.mood_color,
            started_at: self.started_at,
            completed_at: self.completed_at,
            current_day: self.current_day,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> CycleId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn mood_color(&self) -> MoodColor {
        self.mood_color
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Returns when day 7 was recorded, if it has been.
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Returns the day awaiting an entry (7 once completed).
    pub fn current_day(&self) -> DayIndex {
        self.current_day
    }

    /// Returns the lifecycle status, derived from `completed_at`.
    pub fn status(&self) -> CycleStatus {
        if self.completed_at.is_some() {
            CycleStatus::Completed
        } else {
            CycleStatus::InProgress
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Percentage of the program done, as shown on the home screen.
    pub fn progress_percent(&self) -> u8 {
        if self.is_completed() {
            return 100;
        }
        let done = f64::from(self.current_day.value() - 1);
        (done / f64::from(DayIndex::DAYS) * 100.0).round() as u8
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<CycleEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ───────────────────────────────────────────────────────────────
    // Day progression
    // ───────────────────────────────────────────────────────────────

    /// Checks that `day` is the day this cycle is waiting for.
    pub fn validate_can_record(&self, day: DayIndex) -> Result<(), DomainError> {
        if !self.status().is_mutable() {
            return Err(DomainError::new(
                ErrorCode::CycleCompleted,
                "Cannot record a day on a completed cycle",
            ));
        }

        if day != self.current_day {
            return Err(DomainError::new(
                ErrorCode::DayOutOfOrder,
                format!("Expected {}, got {}", self.current_day, day),
            )
            .with_detail("expected", self.current_day.value().to_string())
            .with_detail("actual", day.value().to_string()));
        }

        Ok(())
    }

    /// Records that `day` was answered.
    ///
    /// Advances to the next day, or completes the cycle after day 7.
    pub fn record_day(&mut self, day: DayIndex) -> Result<(), DomainError> {
        self.validate_can_record(day)?;

        self.record_event(CycleEvent::DayRecorded {
            cycle_id: self.id,
            day,
        });

        match day.next() {
            Some(next) => self.current_day = next,
            None => {
                self.status().transition_to(CycleStatus::Completed)?;
                let now = Timestamp::now();
                self.completed_at = Some(now);
                self.record_event(CycleEvent::Completed {
                    cycle_id: self.id,
                    completed_at: now,
                });
            }
        }

        Ok(())
    }

    fn record_event(&mut self, event: CycleEvent) {
        self.domain_events.push(event);
    }
}
