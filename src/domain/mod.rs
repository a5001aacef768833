//! Domain layer - pure types and rules for the seven-day journey.
//!
//! Nothing here performs I/O. Persistence and text generation are reached
//! through the traits in [`crate::ports`].

pub mod cycle;
pub mod foundation;
pub mod insight;
pub mod program;
