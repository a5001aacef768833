//! Journey - the cycle store wired to the insight requester.

use std::sync::Arc;

use thiserror::Error;

use crate::adapters::{FileKeyValueStore, GeminiConfig, GeminiProvider};
use crate::config::AppConfig;
use crate::domain::cycle::{Cycle, DayEntry, DayInput};
use crate::domain::foundation::{DomainError, ErrorCode, MoodColor};
use crate::domain::insight::{FeedbackOutcome, Insight};
use crate::domain::program::DailyTask;
use crate::ports::{AIError, AIProvider, KeyValueStore, StorageKeys};

use super::cycle_store::{CycleStore, CycleStoreError, DaySubmission, JourneyState};
use super::insight_requester::InsightRequester;

/// Errors building the production wiring.
#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("failed to build text-generation provider: {0}")]
    Provider(#[from] AIError),

    #[error("failed to restore journey: {0}")]
    Store(#[from] CycleStoreError),
}

/// A user's journey: one cycle, its journal and its closing report.
pub struct Journey<S: KeyValueStore> {
    store: CycleStore<S>,
    requester: InsightRequester,
}

impl Journey<FileKeyValueStore> {
    /// Builds the file-backed, Gemini-backed journey and restores any
    /// persisted state.
    pub async fn from_config(config: &AppConfig) -> Result<Self, JourneyError> {
        let store = FileKeyValueStore::new(&config.storage.data_dir);
        let keys = StorageKeys::with_prefix(&config.storage.key_prefix);

        let gemini = GeminiConfig::new(config.ai.api_key_or_empty())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries);
        let provider = GeminiProvider::new(gemini)?;

        if !config.ai.has_api_key() {
            tracing::warn!("no API key configured; feedback and reports will use fallback copy");
        }

        let mut journey = Self::new(CycleStore::new(store, keys), Arc::new(provider));
        let state = journey.restore().await?;
        tracing::info!(
            data_dir = %config.storage.data_dir.display(),
            ?state,
            "journey loaded"
        );
        Ok(journey)
    }
}

impl<S: KeyValueStore> Journey<S> {
    pub fn new(store: CycleStore<S>, provider: Arc<dyn AIProvider>) -> Self {
        Self {
            store,
            requester: InsightRequester::new(provider),
        }
    }

    pub fn state(&self) -> JourneyState {
        self.store.state()
    }

    pub fn cycle(&self) -> Option<&Cycle> {
        self.store.cycle()
    }

    pub fn entries(&self) -> &[DayEntry] {
        self.store.entries()
    }

    pub fn journal(&self) -> Vec<&DayEntry> {
        self.store.journal()
    }

    pub fn insight(&self) -> Option<&Insight> {
        self.store.insight()
    }

    pub fn current_task(&self) -> Option<&'static DailyTask> {
        self.store.current_task()
    }

    pub fn previous_fear(&self) -> &str {
        self.store.previous_fear()
    }

    pub fn store(&self) -> &CycleStore<S> {
        &self.store
    }

    pub async fn restore(&mut self) -> Result<JourneyState, CycleStoreError> {
        self.store.restore().await
    }

    pub async fn start(
        &mut self,
        topic: impl Into<String>,
        mood_color: MoodColor,
    ) -> Result<&Cycle, CycleStoreError> {
        self.store.start(topic, mood_color).await
    }

    pub async fn submit_day(
        &mut self,
        submission: DaySubmission,
    ) -> Result<DayEntry, CycleStoreError> {
        self.store.submit_day(submission).await
    }

    pub async fn discard(&mut self) -> Result<(), CycleStoreError> {
        self.store.discard().await
    }

    /// Coaching feedback on the current day's answers.
    ///
    /// Returns `NoActiveCycle` or `CycleCompleted` when there is no day to
    /// answer. The feedback itself never fails.
    pub async fn daily_feedback(&self, input: &DayInput) -> Result<FeedbackOutcome, CycleStoreError> {
        match self.state() {
            JourneyState::InProgress { day } => Ok(self.requester.daily_feedback(day, input).await),
            JourneyState::Completed => Err(DomainError::new(
                ErrorCode::CycleCompleted,
                "All seven days are already recorded",
            )
            .into()),
            JourneyState::NoCycle => Err(no_active_cycle().into()),
        }
    }

    /// Returns the closing report, generating and persisting it on first use.
    ///
    /// An existing report is returned as-is.
    pub async fn request_insight(&mut self) -> Result<Insight, CycleStoreError> {
        let cycle = self.store.cycle().ok_or_else(no_active_cycle)?;
        if !cycle.is_completed() {
            return Err(DomainError::new(
                ErrorCode::CycleNotCompleted,
                format!("The report unlocks after day 7 (currently {})", cycle.current_day()),
            )
            .into());
        }

        if let Some(existing) = self.store.insight() {
            return Ok(existing.clone());
        }

        let outcome = self.requester.generate(cycle, self.store.entries()).await;
        let insight = self.store.record_insight(outcome.into_insight()).await?;
        Ok(insight.clone())
    }
}

fn no_active_cycle() -> DomainError {
    DomainError::new(ErrorCode::NoActiveCycle, "No cycle has been started")
}
