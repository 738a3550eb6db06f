//! Narrative backend types
//!
//! Backend-agnostic prompt and response types shared by all narrative
//! backend implementations.

use serde::{Deserialize, Serialize};

use crate::models::{
    EmotionRecord, GameSessionRecord, JournalRecord, RiskProfile, StabilityScore, StreakState,
};

/// Structured prompt payload for the narrative generator
///
/// Embeds the raw window of records plus the already-computed deterministic
/// signals, so the model narrates over the same data the fallback path uses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativePrompt {
    pub emotion_count: usize,
    pub journal_count: usize,
    pub session_count: usize,
    pub emotions: Vec<EmotionSummary>,
    pub journal_excerpts: Vec<String>,
    pub activities: Vec<String>,
    pub streak: StreakState,
    pub stability: StabilityScore,
    pub risk: RiskProfile,
    pub interventions: Vec<String>,
}

/// Compact per-record emotion summary embedded in the prompt
#[derive(Debug, Clone, Serialize)]
pub struct EmotionSummary {
    pub emotion: String,
    pub intensity: u8,
    pub date: String,
}

/// Maximum journal characters quoted per entry in the prompt
const EXCERPT_CHARS: usize = 280;

impl NarrativePrompt {
    pub fn build(
        emotions: &[EmotionRecord],
        journals: &[JournalRecord],
        sessions: &[GameSessionRecord],
        streak: &StreakState,
        stability: &StabilityScore,
        risk: &RiskProfile,
        interventions: &[String],
    ) -> Self {
        Self {
            emotion_count: emotions.len(),
            journal_count: journals.len(),
            session_count: sessions.len(),
            emotions: emotions
                .iter()
                .map(|r| EmotionSummary {
                    emotion: r.emotion.to_string(),
                    intensity: r.intensity_or_default(),
                    date: r.occurred_at.format("%Y-%m-%d").to_string(),
                })
                .collect(),
            journal_excerpts: journals
                .iter()
                .map(|j| {
                    let mut excerpt: String = j.content.chars().take(EXCERPT_CHARS).collect();
                    if j.content.chars().count() > EXCERPT_CHARS {
                        excerpt.push_str("...");
                    }
                    excerpt
                })
                .collect(),
            activities: sessions.iter().map(|s| s.activity.to_string()).collect(),
            streak: streak.clone(),
            stability: stability.clone(),
            risk: risk.clone(),
            interventions: interventions.to_vec(),
        }
    }

    /// Render the full prompt text sent to the model
    pub fn render(&self) -> String {
        let payload = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        format!(
            "You are a supportive mental-wellness analyst. Given the user's \
             activity data below, respond with ONLY a JSON object with these \
             string/array fields: summary, insights, recommendations, \
             resources, moodTrend, patterns, clinicalAssessment, \
             evidenceBasedInterventions, healthcareOutcomes, riskFactors.\n\n\
             Activity data:\n{}",
            payload
        )
    }
}

/// Raw narrative fields as the model returns them
///
/// Every field is optional: the orchestrator merges this with safe
/// placeholders so a partially-populated model response never propagates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNarrative {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub insights: Option<Vec<String>>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
    #[serde(default)]
    pub mood_trend: Option<String>,
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub clinical_assessment: Option<String>,
    #[serde(default)]
    pub evidence_based_interventions: Option<Vec<String>>,
    #[serde(default)]
    pub healthcare_outcomes: Option<String>,
    #[serde(default)]
    pub risk_factors: Option<String>,
}
