//! Application layer - orchestration over the domain and ports.
//!
//! - `CycleStore` owns the active cycle and persists every change
//! - `InsightRequester` asks the text-generation service for feedback and reports
//! - `Journey` wires the two together

mod cycle_store;
mod insight_requester;
mod journey;

pub use cycle_store::{
    CycleStore, CycleStoreError, DaySubmission, JourneyState, PREVIOUS_FEAR_PLACEHOLDER,
};
pub use insight_requester::InsightRequester;
pub use journey::{Journey, JourneyError};
