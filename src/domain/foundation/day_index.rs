//! DayIndex value object (1-7 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A day of the seven-day program, 1 through 7 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayIndex(u8);

impl DayIndex {
    /// Number of days in a cycle.
    pub const DAYS: u8 = 7;

    /// Creates a DayIndex, returning error if outside 1..=7.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if !(1..=Self::DAYS).contains(&value) {
            return Err(ValidationError::out_of_range(
                "day_index",
                1,
                i64::from(Self::DAYS),
                i64::from(value),
            ));
        }
        Ok(Self(value))
    }

    /// Day 1.
    pub fn first() -> Self {
        Self(1)
    }

    /// Day 7.
    pub fn last() -> Self {
        Self(Self::DAYS)
    }

    /// Returns the following day, or `None` after day 7.
    pub fn next(&self) -> Option<Self> {
        (self.0 < Self::DAYS).then(|| Self(self.0 + 1))
    }

    /// Returns true for day 7.
    pub fn is_last(&self) -> bool {
        self.0 == Self::DAYS
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Zero-based position, for indexing the program catalog.
    pub fn position(&self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All seven days in order.
    pub fn all() -> impl Iterator<Item = DayIndex> {
        (1..=Self::DAYS).map(Self)
    }
}

impl Default for DayIndex {
    fn default() -> Self {
        Self::first()
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<DayIndex> for u8 {
    fn from(day: DayIndex) -> Self {
        day.0
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}", self.0)
    }
}
