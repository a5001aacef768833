//! CycleStore - the single active journey and its persistence.
//!
//! State moves `NoCycle → InProgress(day) → Completed`. Every mutation is
//! written to the key-value store first; the in-memory state only changes
//! once all writes for that mutation have succeeded.

use serde::Serialize;
use thiserror::Error;

use crate::domain::cycle::{Cycle, CycleEvent, CycleSnapshot, DayEntry, DayInput};
use crate::domain::foundation::{
    DayIndex, DomainError, ErrorCode, MoodColor, UserId, ValidationError,
};
use crate::domain::insight::Insight;
use crate::domain::program::{task_for, DailyTask, DaySchema};
use crate::ports::{KeyValueStore, StorageError, StorageKeys};

/// Shown on day 5 when day 2 has not been recorded.
pub const PREVIOUS_FEAR_PLACEHOLDER: &str = "你尚未定義害怕的事";

/// Where the user is in the journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyState {
    NoCycle,
    InProgress { day: DayIndex },
    Completed,
}

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleStoreError {
    /// A precondition or rule was violated; nothing changed.
    #[error("{0}")]
    Domain(DomainError),

    /// Persistence failed; in-memory state is unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CycleStoreError {
    /// Returns the domain error code, if this is a rule violation.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CycleStoreError::Domain(err) => Some(err.code),
            CycleStoreError::Storage(_) => None,
        }
    }

    /// Returns true if the caller violated a precondition.
    pub fn is_validation(&self) -> bool {
        self.code().map_or(false, |code| code.is_validation())
    }
}

impl From<DomainError> for CycleStoreError {
    fn from(err: DomainError) -> Self {
        CycleStoreError::Domain(err)
    }
}

impl From<ValidationError> for CycleStoreError {
    fn from(err: ValidationError) -> Self {
        CycleStoreError::Domain(err.into())
    }
}

/// One day's submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySubmission {
    pub day: DayIndex,
    pub input: DayInput,
    /// Coaching feedback the user saw before submitting, if any.
    pub ai_feedback: Option<String>,
}

impl DaySubmission {
    pub fn new(day: DayIndex, input: DayInput) -> Self {
        Self {
            day,
            input,
            ai_feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.ai_feedback = Some(feedback.into());
        self
    }
}

/// Owner of the active cycle, its entries and its insight.
pub struct CycleStore<S: KeyValueStore> {
    store: S,
    keys: StorageKeys,
    user_id: UserId,
    cycle: Option<Cycle>,
    entries: Vec<DayEntry>,
    insight: Option<Insight>,
}

impl<S: KeyValueStore> CycleStore<S> {
    /// Creates an empty store in `NoCycle`. Call [`restore`](Self::restore)
    /// to load persisted state.
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            user_id: UserId::local(),
            cycle: None,
            entries: Vec::new(),
            insight: None,
        }
    }

    /// Sets the owner stamped on new cycles.
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn state(&self) -> JourneyState {
        match &self.cycle {
            None => JourneyState::NoCycle,
            Some(cycle) if cycle.is_completed() => JourneyState::Completed,
            Some(cycle) => JourneyState::InProgress {
                day: cycle.current_day(),
            },
        }
    }

    pub fn cycle(&self) -> Option<&Cycle> {
        self.cycle.as_ref()
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[DayEntry] {
        &self.entries
    }

    /// Entries sorted by day, for the journal view.
    pub fn journal(&self) -> Vec<&DayEntry> {
        let mut sorted: Vec<&DayEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.day_index);
        sorted
    }

    pub fn insight(&self) -> Option<&Insight> {
        self.insight.as_ref()
    }

    /// The task awaiting an answer, while a cycle is in progress.
    pub fn current_task(&self) -> Option<&'static DailyTask> {
        match self.state() {
            JourneyState::InProgress { day } => Some(task_for(day)),
            _ => None,
        }
    }

    /// The fear written on day 2, shown again on day 5.
    pub fn previous_fear(&self) -> &str {
        self.entries
            .iter()
            .find(|e| e.day_index.value() == 2)
            .and_then(|e| e.raw_input.get_str("fear"))
            .filter(|fear| !fear.trim().is_empty())
            .unwrap_or(PREVIOUS_FEAR_PLACEHOLDER)
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn backing_store(&self) -> &S {
        &self.store
    }

    // ───────────────────────────────────────────────────────────────
    // Operations
    // ───────────────────────────────────────────────────────────────

    /// Starts a new cycle, discarding any previous cycle, entries and insight.
    pub async fn start(
        &mut self,
        topic: impl Into<String>,
        mood_color: MoodColor,
    ) -> Result<&Cycle, CycleStoreError> {
        let mut cycle = Cycle::new(topic, mood_color, self.user_id.clone())?;

        self.store
            .put(self.keys.cycle(), &encode(&cycle.snapshot())?)
            .await?;
        self.store.delete(self.keys.entries()).await?;
        self.store.delete(self.keys.insight()).await?;

        log_events(cycle.take_events());
        self.entries.clear();
        self.insight = None;
        Ok(self.cycle.insert(cycle))
    }

    /// Records the current day's answers.
    ///
    /// # Errors
    ///
    /// - `NoActiveCycle` if nothing was started
    /// - `CycleCompleted` if day 7 is already recorded
    /// - `DayOutOfOrder` if `day` is not the current day
    /// - `IncompleteDay` if a required field is missing or invalid
    /// - `Storage` if the write failed
    pub async fn submit_day(
        &mut self,
        submission: DaySubmission,
    ) -> Result<DayEntry, CycleStoreError> {
        let current = self.cycle.as_ref().ok_or_else(|| {
            DomainError::new(ErrorCode::NoActiveCycle, "No cycle has been started")
        })?;

        let mut next = current.clone();
        next.record_day(submission.day)?;

        DaySchema::for_day(submission.day)
            .validate(&submission.input)
            .map_err(|err| {
                let field = err.field().to_string();
                DomainError::new(ErrorCode::IncompleteDay, err.to_string())
                    .with_detail("field", field)
                    .with_detail("day", submission.day.value().to_string())
            })?;

        let entry = DayEntry::new(next.id(), submission.day, submission.input)
            .with_feedback(submission.ai_feedback);
        let mut entries = self.entries.clone();
        entries.push(entry.clone());

        // Cycle first: a cycle ahead of its entries still restores.
        self.store
            .put(self.keys.cycle(), &encode(&next.snapshot())?)
            .await?;
        self.store
            .put(self.keys.entries(), &encode(&entries)?)
            .await?;

        log_events(next.take_events());
        self.cycle = Some(next);
        self.entries = entries;
        Ok(entry)
    }

    /// Persists the report for the completed cycle.
    pub async fn record_insight(&mut self, insight: Insight) -> Result<&Insight, CycleStoreError> {
        let cycle = self.cycle.as_ref().ok_or_else(|| {
            DomainError::new(ErrorCode::NoActiveCycle, "No cycle has been started")
        })?;

        if !cycle.is_completed() {
            return Err(DomainError::new(
                ErrorCode::CycleNotCompleted,
                "Insight can only be recorded for a completed cycle",
            )
            .into());
        }

        if insight.cycle_id != cycle.id() {
            return Err(DomainError::validation(
                "cycle_id",
                "Insight belongs to a different cycle",
            )
            .into());
        }

        self.store
            .put(self.keys.insight(), &encode(&insight)?)
            .await?;

        tracing::info!(cycle_id = %insight.cycle_id, "insight recorded");
        Ok(self.insight.insert(insight))
    }

    /// Deletes the cycle, entries and insight.
    pub async fn discard(&mut self) -> Result<(), CycleStoreError> {
        self.clear_persisted().await?;

        if let Some(cycle) = self.cycle.take() {
            tracing::info!(cycle_id = %cycle.id(), "cycle discarded");
        }
        self.entries.clear();
        self.insight = None;
        Ok(())
    }

    /// Loads persisted state.
    ///
    /// Anything unreadable, unparseable or contradicting the cycle is
    /// treated as absent: all keys are cleared and the state becomes
    /// `NoCycle`. Entries for days the cycle has not yet recorded are
    /// dropped, since an interrupted submission leaves them behind.
    pub async fn restore(&mut self) -> Result<JourneyState, CycleStoreError> {
        let (raw_cycle, raw_entries, raw_insight) = match self.read_persisted().await {
            Ok(blobs) => blobs,
            Err(err) if err.is_corrupt() => {
                tracing::warn!(reason = %err, "persisted journey is unreadable, clearing it");
                self.clear_persisted().await?;
                self.reset();
                return Ok(JourneyState::NoCycle);
            }
            Err(err) => return Err(err.into()),
        };

        let Some(raw_cycle) = raw_cycle else {
            if raw_entries.is_some() || raw_insight.is_some() {
                tracing::debug!("clearing entries or insight left without a cycle");
                self.clear_persisted().await?;
            }
            self.reset();
            return Ok(JourneyState::NoCycle);
        };

        match decode_persisted(&raw_cycle, raw_entries.as_deref(), raw_insight.as_deref()) {
            Ok((cycle, entries, insight)) => {
                tracing::debug!(
                    cycle_id = %cycle.id(),
                    entries = entries.len(),
                    has_insight = insight.is_some(),
                    "journey restored"
                );
                self.cycle = Some(cycle);
                self.entries = entries;
                self.insight = insight;
            }
            Err(reason) => {
                tracing::warn!(%reason, "persisted journey is corrupt, clearing it");
                self.clear_persisted().await?;
                self.reset();
            }
        }

        Ok(self.state())
    }

    async fn read_persisted(&self) -> Result<RawBlobs, StorageError> {
        Ok((
            self.store.get(self.keys.cycle()).await?,
            self.store.get(self.keys.entries()).await?,
            self.store.get(self.keys.insight()).await?,
        ))
    }

    async fn clear_persisted(&self) -> Result<(), StorageError> {
        for key in self.keys.all() {
            self.store.delete(key).await?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.cycle = None;
        self.entries.clear();
        self.insight = None;
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    Ok(serde_json::to_string(value)?)
}

fn log_events(events: Vec<CycleEvent>) {
    for event in events {
        match event {
            CycleEvent::Started {
                cycle_id,
                mood_color,
                ..
            } => tracing::info!(%cycle_id, %mood_color, "cycle started"),
            CycleEvent::DayRecorded { cycle_id, day } => {
                tracing::info!(%cycle_id, day = day.value(), "day recorded")
            }
            CycleEvent::Completed { cycle_id, .. } => tracing::info!(%cycle_id, "cycle completed"),
        }
    }
}

type RawBlobs = (Option<String>, Option<String>, Option<String>);

type Restored = (Cycle, Vec<DayEntry>, Option<Insight>);

/// Parses and cross-checks the three blobs.
fn decode_persisted(
    raw_cycle: &str,
    raw_entries: Option<&str>,
    raw_insight: Option<&str>,
) -> Result<Restored, String> {
    let snapshot: CycleSnapshot =
        serde_json::from_str(raw_cycle).map_err(|e| format!("cycle: {}", e))?;
    let cycle = Cycle::reconstitute(snapshot).map_err(|e| e.to_string())?;

    let stored: Vec<DayEntry> = match raw_entries {
        Some(raw) => serde_json::from_str(raw).map_err(|e| format!("entries: {}", e))?,
        None => Vec::new(),
    };

    let mut seen = [false; DayIndex::DAYS as usize];
    let mut entries = Vec::with_capacity(stored.len());
    for entry in stored {
        if entry.cycle_id != cycle.id() {
            return Err(format!("entry {} belongs to another cycle", entry.entry_id));
        }
        let recorded = cycle.is_completed() || entry.day_index < cycle.current_day();
        if !recorded {
            // Left behind by an interrupted submission; the day is still open.
            tracing::warn!(
                cycle_id = %cycle.id(),
                day = entry.day_index.value(),
                "dropping entry for a day the cycle has not recorded"
            );
            continue;
        }
        let slot = &mut seen[entry.day_index.position()];
        if *slot {
            return Err(format!("duplicate entry for {}", entry.day_index));
        }
        *slot = true;
        entries.push(entry);
    }

    let recorded_days = recorded_day_count(&cycle);
    if entries.len() < recorded_days {
        tracing::warn!(
            cycle_id = %cycle.id(),
            recorded_days,
            entries = entries.len(),
            "cycle has recorded days with no stored entry"
        );
    }

    let insight: Option<Insight> = match raw_insight {
        Some(raw) => Some(serde_json::from_str(raw).map_err(|e| format!("insight: {}", e))?),
        None => None,
    };
    if let Some(insight) = &insight {
        if insight.cycle_id != cycle.id() {
            return Err("insight belongs to another cycle".to_string());
        }
        if !cycle.is_completed() {
            return Err("insight present on an unfinished cycle".to_string());
        }
    }

    Ok((cycle, entries, insight))
}

/// Days the cycle has moved past.
fn recorded_day_count(cycle: &Cycle) -> usize {
    if cycle.is_completed() {
        usize::from(DayIndex::DAYS)
    } else {
        cycle.current_day().position()
    }
}
