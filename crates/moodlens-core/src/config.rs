//! Engine configuration
//!
//! Small env-driven configuration for the analytics engine. The AI call is
//! the only operation with a timeout; everything else is a cheap pure
//! computation over the fetched window.

use std::time::Duration;

/// Configuration for the insight engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Trailing window (in days) over which records are fetched
    pub lookback_days: i64,
    /// Ceiling for a single narrative-backend call. No retry on failure:
    /// a retried AI call in a user-facing path doubles latency for no
    /// correctness benefit, so the engine goes straight to the fallback.
    pub ai_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            ai_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// - `MOODLENS_LOOKBACK_DAYS`: analysis window in days (default 30)
    /// - `MOODLENS_AI_TIMEOUT_SECS`: narrative call ceiling (default 30)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(days) = std::env::var("MOODLENS_LOOKBACK_DAYS") {
            match days.parse::<i64>() {
                Ok(d) if d > 0 => config.lookback_days = d,
                _ => tracing::warn!(value = %days, "Ignoring invalid MOODLENS_LOOKBACK_DAYS"),
            }
        }

        if let Ok(secs) = std::env::var("MOODLENS_AI_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) if s > 0 => config.ai_timeout = Duration::from_secs(s),
                _ => tracing::warn!(value = %secs, "Ignoring invalid MOODLENS_AI_TIMEOUT_SECS"),
            }
        }

        config
    }
}
