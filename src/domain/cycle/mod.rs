//! Cycle module - The seven-day journey aggregate and its day entries.
//!
//! A Cycle owns its entries by reference only: entries point back at the
//! cycle through `cycle_id` and are stored as a separate blob.

mod aggregate;
mod day_input;
mod entry;
mod events;

pub use aggregate::{Cycle, CycleSnapshot};
pub use day_input::DayInput;
pub use entry::DayEntry;
pub use events::CycleEvent;
