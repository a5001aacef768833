//! InsightRequester - turns a finished journey into a report.
//!
//! Neither operation returns an error. A failed or unusable response is
//! replaced by fixed copy, and the outcome records which path was taken.

use std::sync::Arc;

use crate::domain::cycle::{Cycle, DayEntry, DayInput};
use crate::domain::foundation::DayIndex;
use crate::domain::insight::{
    daily_feedback_prompt, insight_response_schema, weekly_insight_prompt, FeedbackOutcome,
    Insight, InsightOutcome,
};
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata};

/// Requests coaching feedback and weekly reports from a text-generation provider.
#[derive(Clone)]
pub struct InsightRequester {
    provider: Arc<dyn AIProvider>,
}

impl InsightRequester {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Generates the weekly report for a cycle.
    ///
    /// Missing entries are passed through as-is; the model is asked to cope.
    pub async fn generate(&self, cycle: &Cycle, entries: &[DayEntry]) -> InsightOutcome {
        let cycle_id = cycle.id();

        if !cycle.is_completed() {
            tracing::warn!(%cycle_id, "generating insight for an unfinished cycle");
        }
        if entries.len() != usize::from(DayIndex::DAYS) {
            tracing::debug!(%cycle_id, entries = entries.len(), "generating insight from a partial journal");
        }

        let request = CompletionRequest::new(
            weekly_insight_prompt(entries),
            RequestMetadata::for_cycle(cycle_id),
        )
        .with_json_schema(insight_response_schema());
        let trace_id = request.metadata.trace_id.clone();

        let reason = match self.provider.complete(request).await {
            Ok(response) => match Insight::from_response(cycle_id, &response.content) {
                Ok(insight) => {
                    tracing::info!(%cycle_id, %trace_id, "insight generated");
                    return InsightOutcome::Generated(insight);
                }
                Err(err) => format!("malformed response: {}", err),
            },
            Err(err) => err.to_string(),
        };

        tracing::warn!(%cycle_id, %trace_id, %reason, "insight generation failed, using fallback");
        InsightOutcome::Fallback {
            insight: Insight::fallback(cycle_id),
            reason,
        }
    }

    /// Coaching feedback on a day's answers before they are submitted.
    pub async fn daily_feedback(&self, day: DayIndex, input: &DayInput) -> FeedbackOutcome {
        self.feedback_for_text(day, &input.feedback_text()).await
    }

    /// Coaching feedback on free text.
    ///
    /// Blank text short-circuits without calling the provider.
    pub async fn feedback_for_text(&self, day: DayIndex, text: &str) -> FeedbackOutcome {
        if text.trim().is_empty() {
            return FeedbackOutcome::EmptyInput;
        }

        let request = CompletionRequest::new(
            daily_feedback_prompt(day, text),
            RequestMetadata::new(None, uuid::Uuid::new_v4().to_string()),
        );
        let trace_id = request.metadata.trace_id.clone();

        match self.provider.complete(request).await {
            Ok(response) => {
                let content = response.content.trim();
                if content.is_empty() {
                    FeedbackOutcome::EmptyResponse
                } else {
                    FeedbackOutcome::Generated(content.to_string())
                }
            }
            Err(AIError::EmptyResponse) => FeedbackOutcome::EmptyResponse,
            Err(err) => {
                tracing::warn!(day = day.value(), %trace_id, error = %err, "daily feedback failed, using fallback");
                FeedbackOutcome::Fallback {
                    reason: err.to_string(),
                }
            }
        }
    }
}
