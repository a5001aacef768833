//! MoodColor enum chosen when a cycle starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// The color the user picks to represent their mood for the week.
///
/// Drives theming only; it never changes after the cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoodColor {
    GrayBlue,
    MoonWhite,
    Amber,
    LightGold,
}

impl MoodColor {
    /// All colors in the order the onboarding palette shows them.
    pub const ALL: [MoodColor; 4] = [
        MoodColor::GrayBlue,
        MoodColor::MoonWhite,
        MoodColor::Amber,
        MoodColor::LightGold,
    ];

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodColor::GrayBlue => "gray-blue",
            MoodColor::MoonWhite => "moon-white",
            MoodColor::Amber => "amber",
            MoodColor::LightGold => "light-gold",
        }
    }
}

impl fmt::Display for MoodColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodColor::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("mood_color", format!("unknown color '{}'", s))
            })
    }
}
