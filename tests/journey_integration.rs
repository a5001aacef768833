//! End-to-end journeys through the public API.
//!
//! Covers the full seven days, restarts against files on disk, recovery
//! from corrupt storage and the closing report with and without a
//! working text-generation service.

use std::sync::Arc;

use mask_off::adapters::{FileKeyValueStore, InMemoryKeyValueStore, MockAIProvider};
use mask_off::application::{
    CycleStore, DaySubmission, Journey, JourneyState, PREVIOUS_FEAR_PLACEHOLDER,
};
use mask_off::config::AppConfig;
use mask_off::domain::cycle::DayInput;
use mask_off::domain::foundation::{DayIndex, ErrorCode, MoodColor};
use mask_off::domain::insight::{RadarScores, FALLBACK_SUMMARY};
use mask_off::ports::{AIError, KeyValueStore, StorageKeys};
use secrecy::Secret;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn day(v: u8) -> DayIndex {
    DayIndex::try_new(v).unwrap()
}

fn answers(v: u8) -> DayInput {
    match v {
        1 => DayInput::new()
            .with("thought1", "開會前想逃")
            .with("thought2", "怕被問進度")
            .with("thought3", "拖到最後一刻")
            .with("工作", true),
        2 => DayInput::new().with("fear", "被看成無能"),
        3 => DayInput::new()
            .with("q1", "不一定")
            .with("q2", "保護面子")
            .with("q3", "可以"),
        4 => DayInput::new().with("scriptResponse", "我其實還沒準備好"),
        5 => DayInput::new().with("action", "主動回報進度"),
        6 => DayInput::new().with("story", "我說出了真實進度，主管點頭。"),
        _ => DayInput::new().with("discovery", "說真話沒有想像中可怕"),
    }
}

fn file_journey(dir: &TempDir, provider: &MockAIProvider) -> Journey<FileKeyValueStore> {
    let store = CycleStore::new(FileKeyValueStore::new(dir.path()), StorageKeys::default());
    Journey::new(store, Arc::new(provider.clone()))
}

async fn complete_week<S: KeyValueStore>(journey: &mut Journey<S>) {
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();
    for v in 1..=7 {
        journey
            .submit_day(DaySubmission::new(day(v), answers(v)))
            .await
            .unwrap();
    }
}

fn report_body() -> serde_json::Value {
    let report = json!({
        "weekly_summary": "你開始把害怕說出口。",
        "keywords": ["誠實", "行動", "覺察"],
        "radar": {"observe": 82, "verify": 64, "refine": 71, "act": 58, "integrate": 77}
    });
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": report.to_string()}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 900, "candidatesTokenCount": 80}
    })
}

// =============================================================================
// Day-by-day progress
// =============================================================================

#[tokio::test]
async fn first_day_moves_journey_to_day_two() {
    let provider = MockAIProvider::new();
    let store = CycleStore::new(InMemoryKeyValueStore::new(), StorageKeys::default());
    let mut journey = Journey::new(store, Arc::new(provider));

    let cycle = journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();
    assert_eq!(cycle.current_day(), day(1));
    assert_eq!(cycle.progress_percent(), 0);
    assert_eq!(journey.current_task().unwrap().day, 1);

    journey
        .submit_day(DaySubmission::new(day(1), answers(1)))
        .await
        .unwrap();

    assert_eq!(journey.state(), JourneyState::InProgress { day: day(2) });
    assert_eq!(journey.entries().len(), 1);
    assert_eq!(journey.cycle().unwrap().progress_percent(), 14);
    assert_eq!(journey.previous_fear(), PREVIOUS_FEAR_PLACEHOLDER);
}

#[tokio::test]
async fn out_of_order_day_is_rejected_without_change() {
    let dir = TempDir::new().unwrap();
    let mut journey = file_journey(&dir, &MockAIProvider::new());
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();

    let err = journey
        .submit_day(DaySubmission::new(day(3), answers(3)))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::DayOutOfOrder));
    assert_eq!(journey.state(), JourneyState::InProgress { day: day(1) });
    assert!(journey.entries().is_empty());
    assert!(!dir.path().join("maskoff_entries.json").exists());
}

#[tokio::test]
async fn incomplete_day_is_rejected_without_change() {
    let provider = MockAIProvider::new();
    let store = CycleStore::new(InMemoryKeyValueStore::new(), StorageKeys::default());
    let mut journey = Journey::new(store, Arc::new(provider));
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();

    let partial = DayInput::new().with("thought1", "只有一個").with("thought2", " ");
    let err = journey
        .submit_day(DaySubmission::new(day(1), partial))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::IncompleteDay));
    assert_eq!(journey.state(), JourneyState::InProgress { day: day(1) });
}

// =============================================================================
// Persistence across restarts
// =============================================================================

#[tokio::test]
async fn completed_week_survives_restart() {
    let dir = TempDir::new().unwrap();
    let provider = MockAIProvider::new();

    let mut journey = file_journey(&dir, &provider);
    complete_week(&mut journey).await;
    assert_eq!(journey.state(), JourneyState::Completed);
    let cycle_id = journey.cycle().unwrap().id();
    drop(journey);

    let mut reopened = file_journey(&dir, &provider);
    assert_eq!(reopened.restore().await.unwrap(), JourneyState::Completed);

    let cycle = reopened.cycle().unwrap();
    assert_eq!(cycle.id(), cycle_id);
    assert_eq!(cycle.topic(), "誠實面對拖延");
    assert_eq!(cycle.mood_color(), MoodColor::Amber);
    assert_eq!(cycle.progress_percent(), 100);
    assert!(cycle.completed_at().is_some());

    let days: Vec<u8> = reopened.journal().iter().map(|e| e.day_index.value()).collect();
    assert_eq!(days, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(reopened.previous_fear(), "被看成無能");
    assert!(reopened.current_task().is_none());
}

#[tokio::test]
async fn mid_week_restart_resumes_on_the_next_day() {
    let dir = TempDir::new().unwrap();
    let provider = MockAIProvider::new();

    let mut journey = file_journey(&dir, &provider);
    journey.start("誠實面對拖延", MoodColor::LightGold).await.unwrap();
    for v in 1..=3 {
        journey
            .submit_day(DaySubmission::new(day(v), answers(v)))
            .await
            .unwrap();
    }
    drop(journey);

    let mut reopened = file_journey(&dir, &provider);
    assert_eq!(
        reopened.restore().await.unwrap(),
        JourneyState::InProgress { day: day(4) }
    );
    reopened
        .submit_day(DaySubmission::new(day(4), answers(4)))
        .await
        .unwrap();
    assert_eq!(reopened.entries().len(), 4);
}

#[tokio::test]
async fn corrupt_cycle_file_resets_to_no_cycle() {
    let dir = TempDir::new().unwrap();
    let provider = MockAIProvider::new();

    let mut journey = file_journey(&dir, &provider);
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();
    journey
        .submit_day(DaySubmission::new(day(1), answers(1)))
        .await
        .unwrap();
    drop(journey);

    std::fs::write(dir.path().join("maskoff_cycle.json"), "{not json").unwrap();

    let mut reopened = file_journey(&dir, &provider);
    assert_eq!(reopened.restore().await.unwrap(), JourneyState::NoCycle);
    assert!(reopened.cycle().is_none());
    assert!(reopened.entries().is_empty());
    assert!(!dir.path().join("maskoff_cycle.json").exists());
    assert!(!dir.path().join("maskoff_entries.json").exists());

    reopened.start("重新開始", MoodColor::GrayBlue).await.unwrap();
    assert_eq!(reopened.state(), JourneyState::InProgress { day: day(1) });
}

#[tokio::test]
async fn unreadable_cycle_file_resets_to_no_cycle() {
    let dir = TempDir::new().unwrap();
    let provider = MockAIProvider::new();

    let mut journey = file_journey(&dir, &provider);
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();
    journey
        .submit_day(DaySubmission::new(day(1), answers(1)))
        .await
        .unwrap();
    drop(journey);

    std::fs::write(dir.path().join("maskoff_cycle.json"), [0xff, 0xfe, 0x7b]).unwrap();

    let mut reopened = file_journey(&dir, &provider);
    assert_eq!(reopened.restore().await.unwrap(), JourneyState::NoCycle);
    assert!(!dir.path().join("maskoff_cycle.json").exists());
    assert!(!dir.path().join("maskoff_entries.json").exists());
}

#[tokio::test]
async fn configured_journey_starts_despite_unreadable_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("maskoff_cycle.json"), [0xff, 0xfe]).unwrap();
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();

    let journey = Journey::from_config(&config).await.unwrap();

    assert_eq!(journey.state(), JourneyState::NoCycle);
    assert!(!dir.path().join("maskoff_cycle.json").exists());
}

#[tokio::test]
async fn starting_over_discards_the_previous_week() {
    let dir = TempDir::new().unwrap();
    let provider = MockAIProvider::new().with_default_response("x");

    let mut journey = file_journey(&dir, &provider);
    complete_week(&mut journey).await;
    journey.request_insight().await.unwrap();

    journey.start("下一週", MoodColor::MoonWhite).await.unwrap();

    assert_eq!(journey.state(), JourneyState::InProgress { day: day(1) });
    assert!(journey.entries().is_empty());
    assert!(journey.insight().is_none());
    assert!(!dir.path().join("maskoff_insight.json").exists());
}

// =============================================================================
// Closing report
// =============================================================================

#[tokio::test]
async fn failing_service_yields_fixed_fallback_report() {
    let dir = TempDir::new().unwrap();
    let provider = MockAIProvider::new().with_error(AIError::unavailable("503"));

    let mut journey = file_journey(&dir, &provider);
    complete_week(&mut journey).await;
    let insight = journey.request_insight().await.unwrap();

    assert_eq!(insight.cycle_id, journey.cycle().unwrap().id());
    assert_eq!(insight.weekly_summary, FALLBACK_SUMMARY);
    assert_eq!(insight.keywords, vec!["自我覺察", "勇氣"]);
    assert_eq!(
        insight.radar,
        RadarScores {
            observe: 65,
            verify: 50,
            refine: 55,
            act: 45,
            integrate: 60,
        }
    );
}

#[tokio::test]
async fn persisted_report_is_never_regenerated() {
    let dir = TempDir::new().unwrap();
    let first_provider = MockAIProvider::new().with_error(AIError::unavailable("503"));

    let mut journey = file_journey(&dir, &first_provider);
    complete_week(&mut journey).await;
    let original = journey.request_insight().await.unwrap();
    drop(journey);

    let second_provider = MockAIProvider::new().with_default_response("{}");
    let mut reopened = file_journey(&dir, &second_provider);
    reopened.restore().await.unwrap();

    assert_eq!(reopened.insight(), Some(&original));
    assert_eq!(reopened.request_insight().await.unwrap(), original);
    assert_eq!(second_provider.call_count(), 0);
}

#[tokio::test]
async fn report_is_locked_until_day_seven() {
    let provider = MockAIProvider::new().with_default_response("{}");
    let store = CycleStore::new(InMemoryKeyValueStore::new(), StorageKeys::default());
    let mut journey = Journey::new(store, Arc::new(provider.clone()));
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();

    let err = journey.request_insight().await.unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::CycleNotCompleted));
    assert_eq!(provider.call_count(), 0);
}

// =============================================================================
// Production wiring
// =============================================================================

#[tokio::test]
async fn configured_journey_talks_to_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.ai.api_key = Some(Secret::new("test-key".to_string()));
    config.ai.base_url = server.uri();
    config.ai.max_retries = 0;
    config.storage.data_dir = dir.path().to_path_buf();
    assert!(config.validate().is_ok());

    let mut journey = Journey::from_config(&config).await.unwrap();
    assert_eq!(journey.state(), JourneyState::NoCycle);
    complete_week(&mut journey).await;

    let insight = journey.request_insight().await.unwrap();

    assert_eq!(insight.weekly_summary, "你開始把害怕說出口。");
    assert_eq!(insight.keywords, vec!["誠實", "行動", "覺察"]);
    assert_eq!(insight.radar.integrate, 77);
    assert!(dir.path().join("maskoff_insight.json").exists());
}

#[tokio::test]
async fn configured_journey_restores_existing_files() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.storage.key_prefix = "week_".to_string();

    let mut journey = Journey::from_config(&config).await.unwrap();
    journey.start("誠實面對拖延", MoodColor::Amber).await.unwrap();
    assert!(dir.path().join("week_cycle.json").exists());
    drop(journey);

    let reopened = Journey::from_config(&config).await.unwrap();
    assert_eq!(reopened.state(), JourneyState::InProgress { day: day(1) });
}
