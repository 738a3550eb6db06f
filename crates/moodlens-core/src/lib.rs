//! MoodLens Core Library
//!
//! Clinical analytics and risk-assessment engine for the MoodLens
//! mental-wellness tracker:
//! - Engagement streak tracking over activity history
//! - Mood-stability scoring from emotion-intensity series
//! - Rule-based risk classification (deterministic and explainable)
//! - Evidence-based intervention mapping
//! - AI-backed narrative insights with a deterministic fallback path
//! - Pluggable local narrative backends (Ollama, OpenAI-compatible, mock)
//!
//! Persistence, transport, and authentication live in the surrounding
//! product; this crate consumes records through the `ActivityStore` trait
//! and returns freshly computed values.

pub mod ai;
pub mod analytics;
pub mod config;
pub mod error;
pub mod insight;
pub mod models;
pub mod store;

pub use ai::{
    MockBackend, MockMode, NarrativeBackend, NarrativeClient, NarrativePrompt, OllamaBackend,
    OpenAICompatibleBackend, RawNarrative,
};
pub use analytics::{classify_risk, compute_streaks, map_interventions, score_stability};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use insight::InsightEngine;
pub use models::{
    ActivityKind, AnalyticsSnapshot, CompletionState, EmotionRecord, EmotionTag, GameSessionRecord,
    InsightResult, JournalRecord, RiskLevel, RiskProfile, StabilityScore, StreakState, TrendLabel,
};
pub use store::{ActivityStore, MemoryStore};
