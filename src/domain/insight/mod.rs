//! Insight module - the weekly report and the coaching feedback around it.

mod outcome;
mod prompts;
mod report;
mod schema;

pub use outcome::{
    FeedbackOutcome, InsightOutcome, FEEDBACK_EMPTY_INPUT, FEEDBACK_EMPTY_RESPONSE,
    FEEDBACK_FALLBACK,
};
pub use prompts::{daily_feedback_prompt, weekly_insight_prompt, FEEDBACK_MAX_WORDS};
pub use report::{
    Insight, InsightParseError, RadarScores, FALLBACK_KEYWORDS, FALLBACK_SUMMARY, MAX_KEYWORDS,
};
pub use schema::insight_response_schema;
