//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the journaling domain.

mod cycle_status;
mod day_index;
mod errors;
mod ids;
mod mood_color;
mod state_machine;
mod timestamp;

pub use cycle_status::CycleStatus;
pub use day_index::DayIndex;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CycleId, EntryId, UserId};
pub use mood_color::MoodColor;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
