//! Core record and derived-state types for the analytics engine
//!
//! The three record kinds (emotions, journal entries, game sessions) are
//! immutable inputs supplied by the activity store. Everything else here is
//! derived state: recomputed from scratch per request, never mutated in
//! place, so every computation is an idempotent pure function of
//! (records, now).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed set of emotions a user can log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionTag {
    Happy,
    Calm,
    Neutral,
    Excited,
    Sad,
    Anxiety,
    Stress,
    Fear,
    Grief,
}

impl EmotionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionTag::Happy => "happy",
            EmotionTag::Calm => "calm",
            EmotionTag::Neutral => "neutral",
            EmotionTag::Excited => "excited",
            EmotionTag::Sad => "sad",
            EmotionTag::Anxiety => "anxiety",
            EmotionTag::Stress => "stress",
            EmotionTag::Fear => "fear",
            EmotionTag::Grief => "grief",
        }
    }

    /// Whether this emotion counts as negative-valence for risk scanning
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            EmotionTag::Sad
                | EmotionTag::Anxiety
                | EmotionTag::Stress
                | EmotionTag::Fear
                | EmotionTag::Grief
        )
    }
}

impl fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(EmotionTag::Happy),
            "calm" => Ok(EmotionTag::Calm),
            "neutral" => Ok(EmotionTag::Neutral),
            "excited" => Ok(EmotionTag::Excited),
            "sad" => Ok(EmotionTag::Sad),
            "anxiety" => Ok(EmotionTag::Anxiety),
            "stress" => Ok(EmotionTag::Stress),
            "fear" => Ok(EmotionTag::Fear),
            "grief" => Ok(EmotionTag::Grief),
            _ => Err(format!("Unknown emotion tag: {}", s)),
        }
    }
}

/// Therapeutic mini-game kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    BreathingExercise,
    GuidedMeditation,
    Grounding,
    ProgressiveRelaxation,
    ColorTherapy,
    GratitudePractice,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::BreathingExercise => "breathing_exercise",
            ActivityKind::GuidedMeditation => "guided_meditation",
            ActivityKind::Grounding => "grounding",
            ActivityKind::ProgressiveRelaxation => "progressive_relaxation",
            ActivityKind::ColorTherapy => "color_therapy",
            ActivityKind::GratitudePractice => "gratitude_practice",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a game session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Completed,
    Incomplete,
    Abandoned,
}

/// A single logged emotion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionRecord {
    pub user_key: String,
    pub emotion: EmotionTag,
    /// Self-reported intensity 1-10. None when the record arrived without
    /// one; consumers use `intensity_or_default` rather than rejecting it.
    pub intensity: Option<u8>,
    pub occurred_at: DateTime<Utc>,
    pub context: Option<String>,
}

/// Neutral midpoint used when a record is missing its intensity
pub const DEFAULT_INTENSITY: u8 = 5;

impl EmotionRecord {
    pub fn new(user_key: &str, emotion: EmotionTag, intensity: u8, occurred_at: DateTime<Utc>) -> Self {
        Self {
            user_key: user_key.to_string(),
            emotion,
            intensity: Some(intensity),
            occurred_at,
            context: None,
        }
    }

    /// Intensity clamped to the valid 1-10 range, defaulting to the neutral
    /// midpoint when absent. A malformed record never fails a computation.
    pub fn intensity_or_default(&self) -> u8 {
        self.intensity.unwrap_or(DEFAULT_INTENSITY).clamp(1, 10)
    }
}

/// A journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    pub user_key: String,
    pub content: String,
    pub mood: EmotionTag,
    pub tags: Vec<String>,
    pub occurred_at: DateTime<Utc>,
    /// Opaque correlation id of a linked emotion record. Never dereferenced
    /// for mutation; only carried through for downstream correlation.
    pub linked_emotion: Option<String>,
}

impl JournalRecord {
    pub fn new(user_key: &str, content: &str, mood: EmotionTag, occurred_at: DateTime<Utc>) -> Self {
        Self {
            user_key: user_key.to_string(),
            content: content.to_string(),
            mood,
            tags: Vec::new(),
            occurred_at,
            linked_emotion: None,
        }
    }
}

/// A completed (or not) therapeutic mini-game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSessionRecord {
    pub user_key: String,
    pub activity: ActivityKind,
    pub duration_minutes: u32,
    pub completion: CompletionState,
    pub emotion_before: EmotionTag,
    pub emotion_after: Option<EmotionTag>,
    pub occurred_at: DateTime<Utc>,
}

impl GameSessionRecord {
    pub fn new(user_key: &str, activity: ActivityKind, occurred_at: DateTime<Utc>) -> Self {
        Self {
            user_key: user_key.to_string(),
            activity,
            duration_minutes: 5,
            completion: CompletionState::Completed,
            emotion_before: EmotionTag::Neutral,
            emotion_after: None,
            occurred_at,
        }
    }
}

/// Consecutive-day engagement streaks, recomputed per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    /// One flag per day of the current week, indexed Sunday..Saturday
    pub weekly_bitmap: [bool; 7],
}

impl StreakState {
    pub fn empty() -> Self {
        Self {
            current_streak_days: 0,
            longest_streak_days: 0,
            weekly_bitmap: [false; 7],
        }
    }
}

/// Direction of the mood-intensity series over the lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Improving,
    Stable,
    Declining,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Improving => "improving",
            TrendLabel::Stable => "stable",
            TrendLabel::Declining => "declining",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized mood-stability score plus trend direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityScore {
    /// Inverse-variance measure in [0, 1]; 1.0 = no volatility observed
    pub stability: f64,
    pub trend: TrendLabel,
}

/// Rule-assigned risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk classification output; `indicators` is never empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub level: RiskLevel,
    pub indicators: Vec<String>,
}

/// External insight contract. Every field is always populated, on both the
/// AI path and the fallback path, so callers never branch on which path ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub resources: Vec<String>,
    pub mood_trend: String,
    pub patterns: Vec<String>,
    pub clinical_assessment: String,
    pub evidence_based_interventions: Vec<String>,
    pub healthcare_outcomes: String,
    pub risk_factors: String,
}

/// Complete analytics payload for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub streak: StreakState,
    pub stability: StabilityScore,
    pub risk: RiskProfile,
    pub interventions: Vec<String>,
    pub insight: InsightResult,
}
