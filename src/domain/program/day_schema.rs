//! Per-day required-field rules.
//!
//! A day is complete (eligible for submission) only when every required
//! field holds non-blank text within its length limit.

use serde_json::Value;

use crate::domain::cycle::DayInput;
use crate::domain::foundation::{DayIndex, ValidationError};

/// Maximum length of the day-6 story, in characters.
pub const STORY_MAX_CHARS: usize = 200;

/// A required free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredText {
    pub field: &'static str,
    pub max_chars: Option<usize>,
}

impl RequiredText {
    const fn text(field: &'static str) -> Self {
        Self {
            field,
            max_chars: None,
        }
    }

    const fn bounded(field: &'static str, max_chars: usize) -> Self {
        Self {
            field,
            max_chars: Some(max_chars),
        }
    }
}

/// Day-1 situation tags.
pub const DAY1_TAGS: [&str; 3] = ["工作", "關係", "創作"];

const DAY1: [RequiredText; 3] = [
    RequiredText::text("thought1"),
    RequiredText::text("thought2"),
    RequiredText::text("thought3"),
];
const DAY2: [RequiredText; 1] = [RequiredText::text("fear")];
const DAY3: [RequiredText; 3] = [
    RequiredText::text("q1"),
    RequiredText::text("q2"),
    RequiredText::text("q3"),
];
const DAY4: [RequiredText; 1] = [RequiredText::text("scriptResponse")];
const DAY5: [RequiredText; 1] = [RequiredText::text("action")];
const DAY6: [RequiredText; 1] = [RequiredText::bounded("story", STORY_MAX_CHARS)];
const DAY7: [RequiredText; 1] = [RequiredText::text("discovery")];

/// Required fields and optional flags for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchema {
    day: DayIndex,
    required: &'static [RequiredText],
    flags: &'static [&'static str],
}

impl DaySchema {
    /// Returns the schema for a day.
    pub fn for_day(day: DayIndex) -> Self {
        let (required, flags): (&'static [RequiredText], &'static [&'static str]) =
            match day.value() {
                1 => (&DAY1, &DAY1_TAGS),
                2 => (&DAY2, &[]),
                3 => (&DAY3, &[]),
                4 => (&DAY4, &[]),
                5 => (&DAY5, &[]),
                6 => (&DAY6, &[]),
                _ => (&DAY7, &[]),
            };
        Self {
            day,
            required,
            flags,
        }
    }

    pub fn day(&self) -> DayIndex {
        self.day
    }

    pub fn required(&self) -> &'static [RequiredText] {
        self.required
    }

    pub fn flags(&self) -> &'static [&'static str] {
        self.flags
    }

    /// Checks an input against this day's rules.
    ///
    /// Extra fields are allowed as long as they are scalars.
    pub fn validate(&self, input: &DayInput) -> Result<(), ValidationError> {
        for (field, value) in input.iter() {
            if value.is_array() || value.is_object() {
                return Err(ValidationError::invalid_format(
                    field.as_str(),
                    "must be a scalar value",
                ));
            }
        }

        for rule in self.required {
            let text = match input.get(rule.field) {
                None | Some(Value::Null) => return Err(ValidationError::empty_field(rule.field)),
                Some(Value::String(s)) => s,
                Some(_) => {
                    return Err(ValidationError::invalid_format(rule.field, "must be text"))
                }
            };
            if text.trim().is_empty() {
                return Err(ValidationError::empty_field(rule.field));
            }
            if let Some(max) = rule.max_chars {
                let len = text.chars().count();
                if len > max {
                    return Err(ValidationError::out_of_range(
                        rule.field,
                        1,
                        max as i64,
                        len as i64,
                    ));
                }
            }
        }

        for flag in self.flags {
            if let Some(value) = input.get(flag) {
                if !value.is_boolean() {
                    return Err(ValidationError::invalid_format(*flag, "must be true or false"));
                }
            }
        }

        Ok(())
    }

    /// Returns true if the input may be submitted.
    pub fn is_complete(&self, input: &DayInput) -> bool {
        self.validate(input).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(v: u8) -> DayIndex {
        DayIndex::try_new(v).unwrap()
    }

    fn complete_input(v: u8) -> DayInput {
        match v {
            1 => DayInput::new()
                .with("thought1", "a")
                .with("thought2", "b")
                .with("thought3", "c"),
            2 => DayInput::new().with("fear", "我害怕被看成無能"),
            3 => DayInput::new().with("q1", "不會").with("q2", "面子").with("q3", "大部分"),
            4 => DayInput::new().with("scriptResponse", "對方說謝謝你告訴我"),
            5 => DayInput::new().with("action", "我願意在週會說出真實進度"),
            6 => DayInput::new().with("story", "今天我說了真話，然後鬆了一口氣。"),
            _ => DayInput::new().with("discovery", "原來沒有人在意那麼多"),
        }
    }

    #[test]
    fn complete_inputs_pass_for_every_day() {
        for v in 1..=7 {
            assert!(DaySchema::for_day(day(v)).is_complete(&complete_input(v)), "day {}", v);
        }
    }

    #[test]
    fn day1_requires_all_three_thoughts() {
        let input = DayInput::new().with("thought1", "a").with("thought2", "b");
        let err = DaySchema::for_day(day(1)).validate(&input).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("thought3"));
    }

    #[test]
    fn day1_accepts_boolean_tags() {
        let input = complete_input(1).with("工作", true).with("關係", false);
        assert!(DaySchema::for_day(day(1)).is_complete(&input));
    }

    #[test]
    fn day1_rejects_non_boolean_tag() {
        let input = complete_input(1).with("創作", "yes");
        let err = DaySchema::for_day(day(1)).validate(&input).unwrap_err();
        assert_eq!(err.field(), "創作");
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let input = DayInput::new().with("fear", "   ");
        assert_eq!(
            DaySchema::for_day(day(2)).validate(&input).unwrap_err(),
            ValidationError::empty_field("fear")
        );
    }

    #[test]
    fn required_field_must_be_text() {
        let input = DayInput::new().with("action", 5);
        assert!(matches!(
            DaySchema::for_day(day(5)).validate(&input),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn nested_values_are_rejected() {
        let input = complete_input(7).with("extra", serde_json::json!({"a": 1}));
        assert!(!DaySchema::for_day(day(7)).is_complete(&input));
    }

    #[test]
    fn extra_scalar_fields_are_allowed() {
        let input = complete_input(4).with("scriptId", "script2");
        assert!(DaySchema::for_day(day(4)).is_complete(&input));
    }

    #[test]
    fn story_of_exactly_200_chars_is_accepted() {
        let input = DayInput::new().with("story", "真".repeat(200));
        assert!(DaySchema::for_day(day(6)).is_complete(&input));
    }

    #[test]
    fn story_of_201_chars_is_rejected_not_truncated() {
        let input = DayInput::new().with("story", "真".repeat(201));
        let err = DaySchema::for_day(day(6)).validate(&input).unwrap_err();
        assert_eq!(err, ValidationError::out_of_range("story", 1, 200, 201));
    }

    proptest! {
        #[test]
        fn story_length_boundary(len in 1usize..400) {
            let input = DayInput::new().with("story", "a".repeat(len));
            prop_assert_eq!(DaySchema::for_day(day(6)).is_complete(&input), len <= STORY_MAX_CHARS);
        }
    }
}
