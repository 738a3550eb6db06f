//! Integration tests for moodlens-core
//!
//! These tests exercise the full fetch → analyze → insight workflow through
//! the public API, with the in-memory store and the mock narrative backend.

use chrono::{Duration, Utc};
use moodlens_core::{
    ActivityKind, EmotionRecord, EmotionTag, GameSessionRecord, InsightEngine, JournalRecord,
    MemoryStore, MockBackend, MockMode, NarrativeClient, RiskLevel, TrendLabel,
};

const USER: &str = "user-1";

fn empty_store() -> MemoryStore {
    MemoryStore::new()
}

// =============================================================================
// Scenario A: no activity at all
// =============================================================================

#[tokio::test]
async fn test_empty_history_produces_neutral_snapshot() {
    let engine = InsightEngine::new(empty_store());
    let snapshot = engine.analyze(USER).await.unwrap();

    assert_eq!(snapshot.streak.current_streak_days, 0);
    assert_eq!(snapshot.streak.longest_streak_days, 0);
    assert_eq!(snapshot.streak.weekly_bitmap, [false; 7]);

    assert_eq!(snapshot.stability.stability, 1.0);
    assert_eq!(snapshot.stability.trend, TrendLabel::Stable);

    assert_eq!(snapshot.risk.level, RiskLevel::Low);
    assert_eq!(snapshot.risk.indicators, vec!["low risk profile"]);

    assert_eq!(snapshot.interventions, vec!["No interventions recorded"]);

    // Fallback insight is still fully populated.
    assert!(!snapshot.insight.summary.is_empty());
    assert!(snapshot
        .insight
        .recommendations
        .iter()
        .any(|r| r.contains("stress management")));
}

// =============================================================================
// Scenario B: sustained high-intensity anxiety
// =============================================================================

#[tokio::test]
async fn test_repeated_high_intensity_anxiety_is_high_risk() {
    let now = Utc::now();
    let mut store = empty_store();
    for i in 0..3 {
        store.add_emotion(EmotionRecord::new(
            USER,
            EmotionTag::Anxiety,
            9,
            now - Duration::days(i),
        ));
    }

    let engine = InsightEngine::new(store);
    let snapshot = engine.analyze(USER).await.unwrap();

    assert_eq!(snapshot.risk.level, RiskLevel::High);
    assert!(snapshot
        .risk
        .indicators
        .contains(&"High-intensity negative emotions detected".to_string()));
    // Degraded narrative still reflects the elevated risk.
    assert!(snapshot
        .insight
        .clinical_assessment
        .contains("mental health professional"));
}

// =============================================================================
// Scenario C: stability scoring extremes
// =============================================================================

#[tokio::test]
async fn test_stability_extremes() {
    let now = Utc::now();

    let mut flat = empty_store();
    for i in 0..4 {
        flat.add_emotion(EmotionRecord::new(
            USER,
            EmotionTag::Stress,
            8,
            now - Duration::hours(i),
        ));
    }
    let stability = InsightEngine::new(flat).stability(USER).await.unwrap();
    assert_eq!(stability.stability, 1.0);

    let mut volatile = empty_store();
    for (i, intensity) in [1u8, 10, 1, 10].iter().enumerate() {
        volatile.add_emotion(EmotionRecord::new(
            USER,
            EmotionTag::Stress,
            *intensity,
            now - Duration::hours(3 - i as i64),
        ));
    }
    let stability = InsightEngine::new(volatile).stability(USER).await.unwrap();
    // Variance 20.25 on the 1-10 scale: stability = 1 - 20.25/25 = 0.19.
    assert!((stability.stability - 0.19).abs() < 1e-9);
}

// =============================================================================
// Scenario D: narrative backend throws
// =============================================================================

#[tokio::test]
async fn test_failing_backend_still_yields_complete_insight() {
    let now = Utc::now();
    let mut store = empty_store();
    store.add_emotion(EmotionRecord::new(USER, EmotionTag::Calm, 3, now));
    store.add_session(GameSessionRecord::new(
        USER,
        ActivityKind::BreathingExercise,
        now,
    ));

    let engine = InsightEngine::with_narrative(
        store,
        NarrativeClient::Mock(MockBackend::with_mode(MockMode::Failing)),
    );
    let snapshot = engine.analyze(USER).await.unwrap();

    let insight = &snapshot.insight;
    assert!(!insight.summary.is_empty());
    assert!(!insight.insights.is_empty());
    assert!(!insight.recommendations.is_empty());
    assert!(!insight.clinical_assessment.is_empty());
    assert!(insight
        .evidence_based_interventions
        .contains(&"Breathing Exercises".to_string()));
}

// =============================================================================
// Scenario E: high-risk journal keyword
// =============================================================================

#[tokio::test]
async fn test_hopeless_journal_entry_flags_thought_patterns() {
    let now = Utc::now();
    let mut store = empty_store();
    store.add_emotion(EmotionRecord::new(USER, EmotionTag::Happy, 5, now));
    store.add_journal(JournalRecord::new(
        USER,
        "Lately everything feels hopeless even on good days",
        EmotionTag::Sad,
        now,
    ));

    let engine = InsightEngine::new(store);
    let risk = engine.risk(USER).await.unwrap();

    assert!(risk
        .indicators
        .contains(&"Negative thought patterns identified".to_string()));
    // Keyword hits alone never elevate the level.
    assert_eq!(risk.level, RiskLevel::Low);
}

// =============================================================================
// Cross-cutting properties
// =============================================================================

#[tokio::test]
async fn test_streak_spans_all_three_record_kinds() {
    let now = Utc::now();
    let mut store = empty_store();
    store.add_emotion(EmotionRecord::new(USER, EmotionTag::Neutral, 5, now));
    store.add_journal(JournalRecord::new(
        USER,
        "short note",
        EmotionTag::Neutral,
        now - Duration::days(1),
    ));
    store.add_session(GameSessionRecord::new(
        USER,
        ActivityKind::Grounding,
        now - Duration::days(2),
    ));

    let streak = InsightEngine::new(store).streak(USER).await.unwrap();
    assert_eq!(streak.current_streak_days, 3);
}

#[tokio::test]
async fn test_analyze_is_idempotent() {
    let now = Utc::now();
    let mut store = empty_store();
    store.add_emotion(EmotionRecord::new(USER, EmotionTag::Sad, 6, now));
    store.add_journal(JournalRecord::new(
        USER,
        "practiced radical acceptance",
        EmotionTag::Calm,
        now,
    ));

    let engine = InsightEngine::new(store);
    let first = engine.analyze(USER).await.unwrap();
    let second = engine.analyze(USER).await.unwrap();

    assert_eq!(first.streak, second.streak);
    assert_eq!(first.stability, second.stability);
    assert_eq!(first.risk, second.risk);
    assert_eq!(first.interventions, second.interventions);
    assert_eq!(first.insight, second.insight);
}

#[tokio::test]
async fn test_records_outside_lookback_are_ignored() {
    let now = Utc::now();
    let mut store = empty_store();
    // Well outside the default 30-day window.
    for i in 0..3 {
        store.add_emotion(EmotionRecord::new(
            USER,
            EmotionTag::Grief,
            10,
            now - Duration::days(90 + i),
        ));
    }

    let engine = InsightEngine::new(store);
    let snapshot = engine.analyze(USER).await.unwrap();
    assert_eq!(snapshot.risk.level, RiskLevel::Low);
    assert_eq!(snapshot.streak.current_streak_days, 0);
}

#[tokio::test]
async fn test_records_from_other_users_are_isolated() {
    let now = Utc::now();
    let mut store = empty_store();
    for i in 0..3 {
        store.add_emotion(EmotionRecord::new(
            "someone-else",
            EmotionTag::Fear,
            10,
            now - Duration::days(i),
        ));
    }

    let engine = InsightEngine::new(store);
    let snapshot = engine.analyze(USER).await.unwrap();
    assert_eq!(snapshot.risk.level, RiskLevel::Low);
    assert_eq!(snapshot.streak.current_streak_days, 0);
}

#[tokio::test]
async fn test_ai_and_fallback_paths_serialize_identically_shaped_payloads() {
    let now = Utc::now();
    let build = || {
        let mut store = empty_store();
        store.add_emotion(EmotionRecord::new(USER, EmotionTag::Happy, 4, now));
        store
    };

    let ai_snapshot = InsightEngine::with_narrative(
        build(),
        NarrativeClient::Mock(MockBackend::with_mode(MockMode::Wrapped)),
    )
    .analyze(USER)
    .await
    .unwrap();
    let fb_snapshot = InsightEngine::new(build()).analyze(USER).await.unwrap();

    let keys = |v: serde_json::Value| -> Vec<String> {
        let mut ks: Vec<String> = v["insight"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        ks.sort();
        ks
    };

    assert_eq!(
        keys(serde_json::to_value(&ai_snapshot).unwrap()),
        keys(serde_json::to_value(&fb_snapshot).unwrap())
    );
    // The wrapped-prose response parsed successfully, so the AI summary won.
    assert!(ai_snapshot.insight.summary.contains("engaged consistently"));
}

#[tokio::test]
async fn test_malformed_record_does_not_fail_analysis() {
    let now = Utc::now();
    let mut store = empty_store();
    let mut record = EmotionRecord::new(USER, EmotionTag::Anxiety, 9, now);
    record.intensity = None; // arrived without an intensity
    store.add_emotion(record);
    store.add_emotion(EmotionRecord::new(USER, EmotionTag::Calm, 4, now));

    let engine = InsightEngine::new(store);
    let snapshot = engine.analyze(USER).await.unwrap();
    // Defaulted to the neutral midpoint, so no high-intensity hit.
    assert_eq!(snapshot.risk.level, RiskLevel::Low);
    assert!((0.0..=1.0).contains(&snapshot.stability.stability));
}
