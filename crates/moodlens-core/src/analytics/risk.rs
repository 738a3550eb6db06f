//! Rule-based risk classification
//!
//! Scans emotion intensities and journal text for risk indicators and
//! assigns a risk level. This is deliberately a rule table, not a
//! statistical model: every indicator in the output is traceable to exactly
//! one matched rule, so the classification stays deterministic and
//! auditable independent of any language model.

use tracing::debug;

use crate::models::{EmotionRecord, JournalRecord, RiskLevel, RiskProfile};

/// Intensity at or above which a negative emotion qualifies as high-risk
const HIGH_INTENSITY_THRESHOLD: u8 = 8;

/// Qualifying high-intensity record counts for each level
const HIGH_LEVEL_MIN_COUNT: usize = 3;

/// High-risk keyword stems matched case-insensitively as substrings of
/// journal content. Kept as an explicit table rather than folded into AI
/// prompting so the signal stays testable without the model.
const RISK_KEYWORD_STEMS: &[&str] = &[
    "hopeless",
    "worthless",
    "no point",
    "give up",
    "can't go on",
    "cant go on",
    "end it all",
    "hate myself",
    "self-harm",
    "self harm",
    "never get better",
];

pub const INDICATOR_HIGH_INTENSITY: &str = "High-intensity negative emotions detected";
pub const INDICATOR_NEGATIVE_THOUGHTS: &str = "Negative thought patterns identified";
pub const INDICATOR_LOW_RISK: &str = "low risk profile";

/// Classify risk from emotion records and journal entries in the window.
///
/// Both rules are always evaluated (no short-circuit) so `indicators`
/// reports every kind of hit. The level is driven solely by the count of
/// qualifying high-intensity negative-emotion records: `High` at 3+,
/// `Medium` at 1-2, `Low` otherwise. Keyword matches are reported but do
/// not elevate the level on their own; this is a conservative baseline rule
/// set, not a claim of clinical completeness. When nothing matches, the
/// single sentinel indicator keeps the list non-empty.
pub fn classify_risk(emotions: &[EmotionRecord], journals: &[JournalRecord]) -> RiskProfile {
    let mut indicators = Vec::new();

    let high_intensity_count = emotions
        .iter()
        .filter(|r| r.emotion.is_negative() && r.intensity_or_default() >= HIGH_INTENSITY_THRESHOLD)
        .count();

    if high_intensity_count > 0 {
        indicators.push(INDICATOR_HIGH_INTENSITY.to_string());
    }

    let keyword_hit = journals.iter().any(|entry| {
        let content = entry.content.to_lowercase();
        RISK_KEYWORD_STEMS.iter().any(|stem| content.contains(stem))
    });

    if keyword_hit {
        indicators.push(INDICATOR_NEGATIVE_THOUGHTS.to_string());
    }

    let level = if high_intensity_count >= HIGH_LEVEL_MIN_COUNT {
        RiskLevel::High
    } else if high_intensity_count > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    if indicators.is_empty() {
        indicators.push(INDICATOR_LOW_RISK.to_string());
    }

    debug!(
        level = level.as_str(),
        high_intensity_count, keyword_hit, "Risk classification complete"
    );

    RiskProfile { level, indicators }
}
