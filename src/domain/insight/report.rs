//! Insight - the closing report for a completed cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::CycleId;

/// Summary shown when the report could not be generated.
pub const FALLBACK_SUMMARY: &str = "在這次的旅程中，你勇敢地探索了內心。即使過程充滿挑戰，你的每一次記錄都算數。這份報告是個開始，真正的改變發生在每天的微小選擇中。";

/// Keywords shown when the report could not be generated.
pub const FALLBACK_KEYWORDS: [&str; 2] = ["自我覺察", "勇氣"];

/// Keywords kept from a generated report.
pub const MAX_KEYWORDS: usize = 3;

/// Five engagement scores, each 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarScores {
    pub observe: u8,
    pub verify: u8,
    pub refine: u8,
    pub act: u8,
    pub integrate: u8,
}

impl RadarScores {
    /// Axis names in display order.
    pub const AXES: [&'static str; 5] = ["observe", "verify", "refine", "act", "integrate"];

    /// Scores used by the fallback report.
    pub const FALLBACK: RadarScores = RadarScores {
        observe: 65,
        verify: 50,
        refine: 55,
        act: 45,
        integrate: 60,
    };

    /// Scores paired with their axis names.
    pub fn axes(&self) -> [(&'static str, u8); 5] {
        [
            ("observe", self.observe),
            ("verify", self.verify),
            ("refine", self.refine),
            ("act", self.act),
            ("integrate", self.integrate),
        ]
    }
}

/// The generated (or substituted) report for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub cycle_id: CycleId,
    pub weekly_summary: String,
    pub keywords: Vec<String>,
    pub radar: RadarScores,
}

/// Why a service response could not be turned into an Insight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response is missing '{0}'")]
    MissingField(&'static str),

    #[error("'{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

impl Insight {
    /// The fixed report used whenever generation fails.
    pub fn fallback(cycle_id: CycleId) -> Self {
        Self {
            cycle_id,
            weekly_summary: FALLBACK_SUMMARY.to_string(),
            keywords: FALLBACK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            radar: RadarScores::FALLBACK,
        }
    }

    /// Parses a schema-constrained service response.
    ///
    /// Radar scores are clamped to 0..=100 and keywords past the third are
    /// dropped. Anything missing or of the wrong type is an error.
    pub fn from_response(cycle_id: CycleId, text: &str) -> Result<Self, InsightParseError> {
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| InsightParseError::InvalidJson(e.to_string()))?;
        let root = value.as_object().ok_or(InsightParseError::WrongType {
            field: "response",
            expected: "an object",
        })?;

        let weekly_summary = match root.get("weekly_summary") {
            None | Some(Value::Null) => return Err(InsightParseError::MissingField("weekly_summary")),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                return Err(InsightParseError::WrongType {
                    field: "weekly_summary",
                    expected: "a string",
                })
            }
        };

        let keywords = match root.get("keywords") {
            None | Some(Value::Null) => return Err(InsightParseError::MissingField("keywords")),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(|s| s.trim().to_string())
                        .ok_or(InsightParseError::WrongType {
                            field: "keywords",
                            expected: "an array of strings",
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .take(MAX_KEYWORDS)
                .collect(),
            Some(_) => {
                return Err(InsightParseError::WrongType {
                    field: "keywords",
                    expected: "an array of strings",
                })
            }
        };

        let radar = match root.get("radar") {
            None | Some(Value::Null) => return Err(InsightParseError::MissingField("radar")),
            Some(Value::Object(axes)) => parse_radar(axes)?,
            Some(_) => {
                return Err(InsightParseError::WrongType {
                    field: "radar",
                    expected: "an object",
                })
            }
        };

        Ok(Self {
            cycle_id,
            weekly_summary,
            keywords,
            radar,
        })
    }
}

fn parse_radar(axes: &Map<String, Value>) -> Result<RadarScores, InsightParseError> {
    let score = |axis: &'static str| -> Result<u8, InsightParseError> {
        let value = axes.get(axis).ok_or(InsightParseError::MissingField(axis))?;
        let raw = value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.round() as i64))
            .ok_or(InsightParseError::WrongType {
                field: axis,
                expected: "an integer",
            })?;
        Ok(raw.clamp(0, 100) as u8)
    };

    Ok(RadarScores {
        observe: score("observe")?,
        verify: score("verify")?,
        refine: score("refine")?,
        act: score("act")?,
        integrate: score("integrate")?,
    })
}
