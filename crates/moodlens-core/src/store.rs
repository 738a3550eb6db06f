//! Activity store boundary
//!
//! The product's persistence layer (owned by the surrounding application)
//! supplies time-windowed record collections through this trait. Records are
//! validated into the typed shapes in `models` before they cross this
//! boundary, so the analytics core always operates on well-typed values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{EmotionRecord, GameSessionRecord, JournalRecord};

/// Read-only access to one user's activity history
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Emotion logs for a user at or after `since`
    async fn list_emotions(&self, user_key: &str, since: DateTime<Utc>)
        -> Result<Vec<EmotionRecord>>;

    /// Journal entries for a user at or after `since`
    async fn list_journal_entries(
        &self,
        user_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<JournalRecord>>;

    /// Game sessions for a user at or after `since`
    async fn list_game_sessions(
        &self,
        user_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<GameSessionRecord>>;
}

/// In-memory activity store
///
/// Backs unit and integration tests; also handy for development without the
/// real persistence layer. Returns records sorted by `occurred_at` ascending,
/// matching what the production adapter delivers.
#[derive(Default)]
pub struct MemoryStore {
    emotions: Vec<EmotionRecord>,
    journals: Vec<JournalRecord>,
    sessions: Vec<GameSessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_emotion(&mut self, record: EmotionRecord) {
        self.emotions.push(record);
    }

    pub fn add_journal(&mut self, record: JournalRecord) {
        self.journals.push(record);
    }

    pub fn add_session(&mut self, record: GameSessionRecord) {
        self.sessions.push(record);
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn list_emotions(
        &self,
        user_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<EmotionRecord>> {
        let mut records: Vec<EmotionRecord> = self
            .emotions
            .iter()
            .filter(|r| r.user_key == user_key && r.occurred_at >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.occurred_at);
        Ok(records)
    }

    async fn list_journal_entries(
        &self,
        user_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<JournalRecord>> {
        let mut records: Vec<JournalRecord> = self
            .journals
            .iter()
            .filter(|r| r.user_key == user_key && r.occurred_at >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.occurred_at);
        Ok(records)
    }

    async fn list_game_sessions(
        &self,
        user_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<GameSessionRecord>> {
        let mut records: Vec<GameSessionRecord> = self
            .sessions
            .iter()
            .filter(|r| r.user_key == user_key && r.occurred_at >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.occurred_at);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, EmotionTag};
    use chrono::Duration;

    #[tokio::test]
    async fn test_memory_store_filters_by_user_and_window() {
        let now = Utc::now();
        let mut store = MemoryStore::new();
        store.add_emotion(EmotionRecord::new("alice", EmotionTag::Happy, 6, now));
        store.add_emotion(EmotionRecord::new(
            "alice",
            EmotionTag::Sad,
            4,
            now - Duration::days(60),
        ));
        store.add_emotion(EmotionRecord::new("bob", EmotionTag::Calm, 5, now));

        let records = store
            .list_emotions("alice", now - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].emotion, EmotionTag::Happy);
    }

    #[tokio::test]
    async fn test_memory_store_sorts_ascending() {
        let now = Utc::now();
        let mut store = MemoryStore::new();
        store.add_session(GameSessionRecord::new(
            "alice",
            ActivityKind::Grounding,
            now,
        ));
        store.add_session(GameSessionRecord::new(
            "alice",
            ActivityKind::BreathingExercise,
            now - Duration::days(2),
        ));

        let records = store
            .list_game_sessions("alice", now - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].activity, ActivityKind::BreathingExercise);
    }
}
