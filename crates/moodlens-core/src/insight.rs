//! Insight orchestration
//!
//! Composes the four pure analytics signals, invokes the narrative backend
//! with a bounded timeout, and guarantees a complete `InsightResult` on
//! every path. The AI call is the only suspension point in a request; when
//! the backend is absent, times out, errors, or returns unparsable output,
//! the orchestrator substitutes the deterministic fallback so the caller
//! always receives the same field set. If the caller drops the request
//! future, the in-flight AI call is abandoned with it.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::ai::parsing::parse_narrative;
use crate::ai::{NarrativeBackend, NarrativeClient, NarrativePrompt, RawNarrative};
use crate::analytics::{
    classify_risk, compute_streaks, map_interventions, score_stability, DEFAULT_RECOMMENDATION,
    NO_INTERVENTIONS,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{
    AnalyticsSnapshot, EmotionRecord, GameSessionRecord, InsightResult, JournalRecord, RiskLevel,
    RiskProfile, StabilityScore, StreakState,
};
use crate::store::ActivityStore;

/// The analytics and insight engine for one activity store
///
/// The narrative client is injected at construction (never a global
/// singleton) so tests can substitute a mock without touching the
/// environment.
pub struct InsightEngine<S: ActivityStore> {
    store: S,
    narrative: Option<NarrativeClient>,
    config: EngineConfig,
}

impl<S: ActivityStore> InsightEngine<S> {
    /// Create an engine with no narrative backend (fallback-only)
    pub fn new(store: S) -> Self {
        Self {
            store,
            narrative: None,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            narrative: None,
            config,
        }
    }

    pub fn with_narrative(store: S, narrative: NarrativeClient) -> Self {
        Self {
            store,
            narrative: Some(narrative),
            config: EngineConfig::default(),
        }
    }

    pub fn with_narrative_and_config(
        store: S,
        narrative: NarrativeClient,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            narrative: Some(narrative),
            config,
        }
    }

    fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.config.lookback_days)
    }

    /// Compute the full analytics payload for a user
    ///
    /// Fetches the lookback window once, runs the four pure computations
    /// over that immutable snapshot, then produces the insight narrative.
    /// Only an activity-store failure surfaces as `Err`; every narrative
    /// failure is recovered locally via the fallback path.
    pub async fn analyze(&self, user_key: &str) -> Result<AnalyticsSnapshot> {
        let now = Utc::now();
        let since = self.window_start(now);

        let emotions = self.store.list_emotions(user_key, since).await?;
        let journals = self.store.list_journal_entries(user_key, since).await?;
        let sessions = self.store.list_game_sessions(user_key, since).await?;

        let streak = streak_of(&emotions, &journals, &sessions, now);
        let stability = stability_of(&emotions);
        let risk = classify_risk(&emotions, &journals);
        let interventions = map_interventions(&sessions, &journals);

        debug!(
            user = user_key,
            emotions = emotions.len(),
            journals = journals.len(),
            sessions = sessions.len(),
            risk = risk.level.as_str(),
            "Analytics signals computed"
        );

        let insight = self
            .generate_insight(
                &emotions,
                &journals,
                &sessions,
                &streak,
                &stability,
                &risk,
                &interventions,
            )
            .await;

        Ok(AnalyticsSnapshot {
            streak,
            stability,
            risk,
            interventions,
            insight,
        })
    }

    /// Streak state alone (ancillary payload)
    pub async fn streak(&self, user_key: &str) -> Result<StreakState> {
        let now = Utc::now();
        let since = self.window_start(now);
        let emotions = self.store.list_emotions(user_key, since).await?;
        let journals = self.store.list_journal_entries(user_key, since).await?;
        let sessions = self.store.list_game_sessions(user_key, since).await?;
        Ok(streak_of(&emotions, &journals, &sessions, now))
    }

    /// Stability score alone (ancillary payload)
    pub async fn stability(&self, user_key: &str) -> Result<StabilityScore> {
        let now = Utc::now();
        let emotions = self
            .store
            .list_emotions(user_key, self.window_start(now))
            .await?;
        Ok(stability_of(&emotions))
    }

    /// Risk profile alone (ancillary payload)
    pub async fn risk(&self, user_key: &str) -> Result<RiskProfile> {
        let now = Utc::now();
        let since = self.window_start(now);
        let emotions = self.store.list_emotions(user_key, since).await?;
        let journals = self.store.list_journal_entries(user_key, since).await?;
        Ok(classify_risk(&emotions, &journals))
    }

    /// Intervention list alone (ancillary payload)
    pub async fn interventions(&self, user_key: &str) -> Result<Vec<String>> {
        let now = Utc::now();
        let since = self.window_start(now);
        let journals = self.store.list_journal_entries(user_key, since).await?;
        let sessions = self.store.list_game_sessions(user_key, since).await?;
        Ok(map_interventions(&sessions, &journals))
    }

    #[allow(clippy::too_many_arguments)]
    async fn generate_insight(
        &self,
        emotions: &[EmotionRecord],
        journals: &[JournalRecord],
        sessions: &[GameSessionRecord],
        streak: &StreakState,
        stability: &StabilityScore,
        risk: &RiskProfile,
        interventions: &[String],
    ) -> InsightResult {
        let fallback = fallback_insight(emotions, journals, streak, stability, risk, interventions);

        let Some(ref client) = self.narrative else {
            debug!("No narrative backend configured, using fallback insight");
            return fallback;
        };

        let prompt = NarrativePrompt::build(
            emotions,
            journals,
            sessions,
            streak,
            stability,
            risk,
            interventions,
        )
        .render();

        let response =
            match tokio::time::timeout(self.config.ai_timeout, client.generate_narrative(&prompt))
                .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!(
                        model = client.model(),
                        error = %e,
                        "Narrative backend failed, using fallback insight"
                    );
                    return fallback;
                }
                Err(_) => {
                    warn!(
                        model = client.model(),
                        timeout_secs = self.config.ai_timeout.as_secs(),
                        "Narrative backend timed out, using fallback insight"
                    );
                    return fallback;
                }
            };

        match parse_narrative(&response) {
            Ok(raw) => merge_narrative(raw, fallback),
            Err(e) => {
                warn!(
                    model = client.model(),
                    error = %e,
                    "Unparsable narrative response, using fallback insight"
                );
                fallback
            }
        }
    }
}

fn streak_of(
    emotions: &[EmotionRecord],
    journals: &[JournalRecord],
    sessions: &[GameSessionRecord],
    now: DateTime<Utc>,
) -> StreakState {
    let timestamps: Vec<DateTime<Utc>> = emotions
        .iter()
        .map(|r| r.occurred_at)
        .chain(journals.iter().map(|r| r.occurred_at))
        .chain(sessions.iter().map(|r| r.occurred_at))
        .collect();
    compute_streaks(&timestamps, now.date_naive())
}

fn stability_of(emotions: &[EmotionRecord]) -> StabilityScore {
    // Store adapters deliver records ordered by occurred_at ascending, so
    // the intensity series is already chronological.
    let intensities: Vec<f64> = emotions
        .iter()
        .map(|r| r.intensity_or_default() as f64)
        .collect();
    score_stability(&intensities)
}

/// Merge parsed narrative fields over the fallback values.
///
/// Any field the model omitted (or returned empty) keeps its deterministic
/// fallback value, so a partially-populated model response never reaches
/// the caller.
fn merge_narrative(raw: RawNarrative, fallback: InsightResult) -> InsightResult {
    let non_empty_str = |v: Option<String>, fb: String| match v {
        Some(s) if !s.trim().is_empty() => s,
        _ => fb,
    };
    let non_empty_vec = |v: Option<Vec<String>>, fb: Vec<String>| match v {
        Some(xs) if !xs.is_empty() => xs,
        _ => fb,
    };

    InsightResult {
        summary: non_empty_str(raw.summary, fallback.summary),
        insights: non_empty_vec(raw.insights, fallback.insights),
        recommendations: non_empty_vec(raw.recommendations, fallback.recommendations),
        resources: non_empty_vec(raw.resources, fallback.resources),
        mood_trend: non_empty_str(raw.mood_trend, fallback.mood_trend),
        patterns: non_empty_vec(raw.patterns, fallback.patterns),
        clinical_assessment: non_empty_str(raw.clinical_assessment, fallback.clinical_assessment),
        evidence_based_interventions: non_empty_vec(
            raw.evidence_based_interventions,
            fallback.evidence_based_interventions,
        ),
        healthcare_outcomes: non_empty_str(raw.healthcare_outcomes, fallback.healthcare_outcomes),
        risk_factors: non_empty_str(raw.risk_factors, fallback.risk_factors),
    }
}

/// Deterministic insight built entirely from templates plus the computed
/// signals, so degraded mode still reflects the user's real data; only the
/// free-text narrative is generic.
fn fallback_insight(
    emotions: &[EmotionRecord],
    journals: &[JournalRecord],
    streak: &StreakState,
    stability: &StabilityScore,
    risk: &RiskProfile,
    interventions: &[String],
) -> InsightResult {
    let summary = format!(
        "Over the analysis window you logged {} emotion check-in(s) and {} journal entr(ies). \
         Your current engagement streak is {} day(s).",
        emotions.len(),
        journals.len(),
        streak.current_streak_days
    );

    let mut insights = Vec::new();
    if streak.current_streak_days >= 3 {
        insights.push(format!(
            "You have checked in {} days in a row; regular tracking supports self-awareness.",
            streak.current_streak_days
        ));
    }
    insights.push(format!(
        "Your mood stability score is {:.2} with a {} trend.",
        stability.stability, stability.trend
    ));
    if !journals.is_empty() {
        insights.push("Journaling regularly helps surface thought patterns over time.".to_string());
    }

    let mut recommendations = vec![
        "Keep logging emotions daily to strengthen your streak.".to_string(),
        "Review your journal entries for recurring situations or triggers.".to_string(),
    ];
    if interventions == [NO_INTERVENTIONS.to_string()] {
        recommendations.push(format!("{}.", DEFAULT_RECOMMENDATION));
    }

    let clinical_assessment = match risk.level {
        RiskLevel::High => {
            "Multiple high-intensity negative emotions were recorded in this window. \
             Consider reaching out to a mental health professional."
        }
        RiskLevel::Medium => {
            "Some elevated emotional intensity was recorded. Continued self-monitoring \
             and use of coping techniques is encouraged."
        }
        RiskLevel::Low => {
            "Recorded activity is within expected ranges. Continued engagement with \
             tracking and therapeutic exercises is encouraged."
        }
    }
    .to_string();

    InsightResult {
        summary,
        insights,
        recommendations,
        resources: vec![
            "Grounding techniques overview".to_string(),
            "Guided breathing exercise library".to_string(),
            "Crisis support: contact your local helpline if you need immediate help".to_string(),
        ],
        mood_trend: stability.trend.to_string(),
        patterns: risk.indicators.clone(),
        clinical_assessment,
        evidence_based_interventions: interventions.to_vec(),
        healthcare_outcomes:
            "Consistent engagement with mood tracking is associated with improved emotional \
             regulation and earlier identification of concerning changes."
                .to_string(),
        risk_factors: risk.indicators.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockBackend, MockMode};
    use crate::models::EmotionTag;
    use crate::store::MemoryStore;
    use std::time::Duration as StdDuration;

    fn store_with_activity() -> MemoryStore {
        let now = Utc::now();
        let mut store = MemoryStore::new();
        store.add_emotion(EmotionRecord::new("u1", EmotionTag::Anxiety, 9, now));
        store.add_journal(JournalRecord::new(
            "u1",
            "My thinking kept spiraling today",
            EmotionTag::Stress,
            now,
        ));
        store
    }

    fn assert_fully_populated(insight: &InsightResult) {
        assert!(!insight.summary.is_empty());
        assert!(!insight.insights.is_empty());
        assert!(!insight.recommendations.is_empty());
        assert!(!insight.resources.is_empty());
        assert!(!insight.mood_trend.is_empty());
        assert!(!insight.patterns.is_empty());
        assert!(!insight.clinical_assessment.is_empty());
        assert!(!insight.evidence_based_interventions.is_empty());
        assert!(!insight.healthcare_outcomes.is_empty());
        assert!(!insight.risk_factors.is_empty());
    }

    #[tokio::test]
    async fn test_no_backend_uses_fallback() {
        let engine = InsightEngine::new(store_with_activity());
        let snapshot = engine.analyze("u1").await.unwrap();
        assert_fully_populated(&snapshot.insight);
        assert_eq!(snapshot.risk.level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_ai_path_merges_model_fields() {
        let engine = InsightEngine::with_narrative(
            store_with_activity(),
            NarrativeClient::Mock(MockBackend::new()),
        );
        let snapshot = engine.analyze("u1").await.unwrap();
        assert_fully_populated(&snapshot.insight);
        // Summary comes from the mock's canned narrative.
        assert!(snapshot.insight.summary.contains("engaged consistently"));
    }

    #[tokio::test]
    async fn test_partial_model_response_keeps_fallback_fields() {
        let engine = InsightEngine::with_narrative(
            store_with_activity(),
            NarrativeClient::Mock(MockBackend::with_mode(MockMode::Partial)),
        );
        let snapshot = engine.analyze("u1").await.unwrap();
        assert_eq!(snapshot.insight.summary, "Partial analysis only");
        assert_eq!(snapshot.insight.mood_trend, "improving");
        // Fields the model omitted keep deterministic fallback values.
        assert_fully_populated(&snapshot.insight);
        assert!(snapshot
            .insight
            .risk_factors
            .contains("High-intensity negative emotions detected"));
    }

    #[tokio::test]
    async fn test_failing_backend_falls_back() {
        let engine = InsightEngine::with_narrative(
            store_with_activity(),
            NarrativeClient::Mock(MockBackend::with_mode(MockMode::Failing)),
        );
        let snapshot = engine.analyze("u1").await.unwrap();
        assert_fully_populated(&snapshot.insight);
        assert!(snapshot.insight.summary.contains("emotion check-in"));
    }

    #[tokio::test]
    async fn test_unparsable_response_falls_back() {
        let engine = InsightEngine::with_narrative(
            store_with_activity(),
            NarrativeClient::Mock(MockBackend::with_mode(MockMode::Unparsable)),
        );
        let snapshot = engine.analyze("u1").await.unwrap();
        assert!(snapshot.insight.summary.contains("emotion check-in"));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_to_fallback() {
        let config = EngineConfig {
            ai_timeout: StdDuration::from_millis(20),
            ..EngineConfig::default()
        };
        let engine = InsightEngine::with_narrative_and_config(
            store_with_activity(),
            NarrativeClient::Mock(MockBackend::with_mode(MockMode::Slow(
                StdDuration::from_secs(5),
            ))),
            config,
        );
        let snapshot = engine.analyze("u1").await.unwrap();
        assert!(snapshot.insight.summary.contains("emotion check-in"));
    }

    #[tokio::test]
    async fn test_both_paths_share_field_schema() {
        let fallback_engine = InsightEngine::new(store_with_activity());
        let ai_engine = InsightEngine::with_narrative(
            store_with_activity(),
            NarrativeClient::Mock(MockBackend::new()),
        );

        let a = serde_json::to_value(&fallback_engine.analyze("u1").await.unwrap().insight).unwrap();
        let b = serde_json::to_value(&ai_engine.analyze("u1").await.unwrap().insight).unwrap();

        let keys = |v: &serde_json::Value| {
            let mut ks: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
            ks.sort();
            ks
        };
        assert_eq!(keys(&a), keys(&b));
    }

    #[tokio::test]
    async fn test_ancillary_payloads() {
        let engine = InsightEngine::new(store_with_activity());
        let streak = engine.streak("u1").await.unwrap();
        assert_eq!(streak.current_streak_days, 1);

        let risk = engine.risk("u1").await.unwrap();
        assert_eq!(risk.level, RiskLevel::Medium);

        let interventions = engine.interventions("u1").await.unwrap();
        assert!(interventions.contains(&"Cognitive Restructuring".to_string()));
    }
}
