//! Evidence-based intervention mapping
//!
//! Maps observed activity kinds and journal keywords to named therapeutic
//! techniques (CBT, DBT, mindfulness, etc.). Like the risk classifier, this
//! is an explicit lookup/keyword table so the recommendations stay
//! deterministic and auditable.

use crate::models::{ActivityKind, GameSessionRecord, JournalRecord};

/// Sentinel returned when no intervention signal exists in the window.
/// Consumer-facing lists in this engine are non-empty by contract.
pub const NO_INTERVENTIONS: &str = "No interventions recorded";

/// Recommendation paired with the sentinel in degraded narrative output
pub const DEFAULT_RECOMMENDATION: &str = "Consider stress management techniques";

/// Technique-indicative keyword stems scanned over journal text
const TECHNIQUE_STEMS: &[(&str, &str)] = &[
    ("thought", "Cognitive Restructuring"),
    ("thinking", "Cognitive Restructuring"),
    ("accept", "Radical Acceptance"),
    ("radical", "Radical Acceptance"),
    ("breath", "Breathing Exercises"),
    ("grateful", "Gratitude Practice"),
    ("gratitude", "Gratitude Practice"),
    ("mindful", "Mindfulness Meditation"),
];

/// Named technique practiced by a game activity kind
pub fn technique_for_activity(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::BreathingExercise => "Breathing Exercises",
        ActivityKind::GuidedMeditation => "Mindfulness Meditation",
        ActivityKind::Grounding => "Grounding Techniques (5-4-3-2-1)",
        ActivityKind::ProgressiveRelaxation => "Progressive Muscle Relaxation",
        ActivityKind::ColorTherapy => "Color Therapy",
        ActivityKind::GratitudePractice => "Gratitude Practice",
    }
}

/// Derive the set of evidence-based techniques observed in the window.
///
/// Game sessions map through the activity lookup table; any journal entry at
/// all adds CBT (journaling is treated as a CBT-adjacent practice); keyword
/// stems over journal text add further named skills. The result preserves
/// first-seen order and is deduplicated. With no signal at all, the single
/// sentinel entry is returned instead of an empty list.
pub fn map_interventions(
    sessions: &[GameSessionRecord],
    journals: &[JournalRecord],
) -> Vec<String> {
    let mut techniques: Vec<String> = Vec::new();
    let push_unique = |technique: &str, out: &mut Vec<String>| {
        if !out.iter().any(|t| t == technique) {
            out.push(technique.to_string());
        }
    };

    for session in sessions {
        push_unique(technique_for_activity(session.activity), &mut techniques);
    }

    if !journals.is_empty() {
        push_unique("Cognitive Behavioral Therapy (CBT)", &mut techniques);
    }

    for entry in journals {
        let content = entry.content.to_lowercase();
        for (stem, technique) in TECHNIQUE_STEMS {
            if content.contains(stem) {
                push_unique(technique, &mut techniques);
            }
        }
    }

    if techniques.is_empty() {
        techniques.push(NO_INTERVENTIONS.to_string());
    }

    techniques
}
