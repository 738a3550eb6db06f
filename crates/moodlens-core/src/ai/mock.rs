//! Mock backend for testing
//!
//! Configurable replies for every degradation path the orchestrator has to
//! handle: a well-formed narrative, prose-wrapped JSON, unparsable output,
//! a hard failure, and a slow response for timeout tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::NarrativeBackend;

/// What the mock should do when asked for a narrative
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockMode {
    /// Return a complete, well-formed JSON narrative
    Complete,
    /// Return valid JSON wrapped in conversational prose
    Wrapped,
    /// Return only a subset of the narrative fields
    Partial,
    /// Return text with no JSON in it
    Unparsable,
    /// Return an error
    Failing,
    /// Sleep for the given duration before answering
    Slow(Duration),
}

/// Mock narrative backend for testing
#[derive(Clone)]
pub struct MockBackend {
    mode: MockMode,
    healthy: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend returning complete narratives
    pub fn new() -> Self {
        Self {
            mode: MockMode::Complete,
            healthy: true,
        }
    }

    pub fn with_mode(mode: MockMode) -> Self {
        Self {
            mode,
            healthy: true,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            mode: MockMode::Failing,
            healthy: false,
        }
    }

    fn complete_narrative() -> &'static str {
        r#"{
            "summary": "You have engaged consistently this week and your mood shows steady regulation.",
            "insights": ["Journaling sessions cluster on higher-stress days", "Breathing exercises precede calmer evenings"],
            "recommendations": ["Keep the evening check-in habit", "Try a grounding exercise before difficult meetings"],
            "resources": ["Mindfulness basics guide", "Sleep hygiene checklist"],
            "moodTrend": "stable",
            "patterns": ["Midweek stress spikes"],
            "clinicalAssessment": "Engagement and self-regulation indicators are within healthy ranges.",
            "evidenceBasedInterventions": ["Breathing Exercises", "Cognitive Behavioral Therapy (CBT)"],
            "healthcareOutcomes": "Continued engagement is associated with improved emotional regulation.",
            "riskFactors": "No acute risk factors identified."
        }"#
    }
}

#[async_trait]
impl NarrativeBackend for MockBackend {
    async fn generate_narrative(&self, _prompt: &str) -> Result<String> {
        match &self.mode {
            MockMode::Complete => Ok(Self::complete_narrative().to_string()),
            MockMode::Wrapped => Ok(format!(
                "Of course! Here is the analysis you asked for:\n{}\nLet me know if you need more.",
                Self::complete_narrative()
            )),
            MockMode::Partial => {
                Ok(r#"{"summary": "Partial analysis only", "moodTrend": "improving"}"#.to_string())
            }
            MockMode::Unparsable => {
                Ok("I am unable to produce structured output right now.".to_string())
            }
            MockMode::Failing => Err(Error::BackendUnavailable("mock backend failure".into())),
            MockMode::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::complete_narrative().to_string())
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
