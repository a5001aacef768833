//! Generation outcomes, tagged as generated or substituted.
//!
//! Callers usually collapse an outcome into the value to show; tests and
//! logs look at the tag.

use super::Insight;

/// Shown instead of calling the service when nothing was typed.
pub const FEEDBACK_EMPTY_INPUT: &str = "請先輸入你的想法，我才能提供回饋。";

/// Shown when the service answered with no text.
pub const FEEDBACK_EMPTY_RESPONSE: &str = "感謝你的分享,請繼續保持真誠。";

/// Shown when the service call failed.
pub const FEEDBACK_FALLBACK: &str = "抱歉，分析時發生錯誤。請稍後再試。";

/// Result of asking for a weekly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    Generated(Insight),
    Fallback { insight: Insight, reason: String },
}

impl InsightOutcome {
    pub fn insight(&self) -> &Insight {
        match self {
            InsightOutcome::Generated(insight) | InsightOutcome::Fallback { insight, .. } => insight,
        }
    }

    pub fn into_insight(self) -> Insight {
        match self {
            InsightOutcome::Generated(insight) | InsightOutcome::Fallback { insight, .. } => insight,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, InsightOutcome::Fallback { .. })
    }
}

/// Result of asking for one day's coaching feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Trimmed service text.
    Generated(String),
    EmptyResponse,
    EmptyInput,
    Fallback { reason: String },
}

impl FeedbackOutcome {
    /// The text to show the user.
    pub fn message(&self) -> &str {
        match self {
            FeedbackOutcome::Generated(text) => text,
            FeedbackOutcome::EmptyResponse => FEEDBACK_EMPTY_RESPONSE,
            FeedbackOutcome::EmptyInput => FEEDBACK_EMPTY_INPUT,
            FeedbackOutcome::Fallback { .. } => FEEDBACK_FALLBACK,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            FeedbackOutcome::Generated(text) => text,
            other => other.message().to_string(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, FeedbackOutcome::Generated(_))
    }
}
