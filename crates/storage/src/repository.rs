use async_trait::async_trait;
use course_core::model::{
    BadgeId, DEFAULT_LEVEL, ExerciseId, LessonId, LevelId, ModuleId, ProgressState, QuizId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the learner's progress record is stored.
pub const PROGRESS_KEY: &str = "course-progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the learner's progress.
///
/// This mirrors the domain `ProgressState` so repositories can
/// serialize/deserialize without leaking storage concerns into the domain
/// layer. Field names are a compatibility contract: records written by
/// earlier versions must keep deserializing, so renaming a field here is a
/// breaking change. Missing fields fall back to their empty defaults, which
/// also lets older records load after a field is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed_lessons: Vec<LessonId>,
    #[serde(default)]
    pub completed_modules: Vec<ModuleId>,
    #[serde(default)]
    pub quiz_scores: HashMap<QuizId, u8>,
    #[serde(default)]
    pub exercise_scores: HashMap<ExerciseId, u8>,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub badges: Vec<BadgeId>,
    #[serde(default = "default_current_level")]
    pub current_level: LevelId,
}

fn default_current_level() -> LevelId {
    LevelId::new(DEFAULT_LEVEL)
}

impl ProgressRecord {
    #[must_use]
    pub fn from_state(state: &ProgressState) -> Self {
        Self {
            completed_lessons: state.completed_lessons().to_vec(),
            completed_modules: state.completed_modules().to_vec(),
            quiz_scores: state.quiz_scores().clone(),
            exercise_scores: state.exercise_scores().clone(),
            total_points: state.total_points(),
            badges: state.badges().to_vec(),
            current_level: state.current_level().clone(),
        }
    }

    /// Convert the record back into a domain `ProgressState`.
    ///
    /// Records are not trusted: the domain constructor deduplicates the
    /// completion sets and clamps scores, so a hand-edited or stale record
    /// rehydrates into a state that upholds the invariants.
    #[must_use]
    pub fn into_state(self) -> ProgressState {
        ProgressState::from_persisted(
            self.completed_lessons,
            self.completed_modules,
            self.quiz_scores,
            self.exercise_scores,
            self.total_points,
            self.badges,
            self.current_level,
        )
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::from_state(&ProgressState::default())
    }
}

/// Repository contract for the learner's progress record.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the persisted progress record, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read or the
    /// stored payload cannot be decoded.
    async fn load(&self) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist the progress record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    record: Arc<Mutex<Option<ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }
}

/// Aggregates the progress repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{LessonId, ModuleId, QuizId};

    fn sample_record() -> ProgressRecord {
        let mut state = ProgressState::default();
        state.complete_lesson(LessonId::new("l1"), 10);
        state.complete_lesson(LessonId::new("l2"), 20);
        state.save_quiz_score(QuizId::new("q1"), 80);
        state.complete_module(ModuleId::new("m1"));
        ProgressRecord::from_state(&state)
    }

    #[tokio::test]
    async fn round_trips_record_in_memory() {
        let repo = InMemoryRepository::new();
        let record = sample_record();

        repo.save(&record).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn load_without_a_save_is_none() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_the_previous_record() {
        let repo = InMemoryRepository::new();
        repo.save(&ProgressRecord::default()).await.unwrap();

        let record = sample_record();
        repo.save(&record).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.total_points, 30);
        assert_eq!(loaded.completed_modules, vec![ModuleId::new("m1")]);
    }

    #[test]
    fn record_state_round_trip_preserves_everything() {
        let record = sample_record();
        let state = record.clone().into_state();

        assert_eq!(ProgressRecord::from_state(&state), record);
    }

    #[test]
    fn default_record_matches_default_state() {
        let record = ProgressRecord::default();

        assert!(record.completed_lessons.is_empty());
        assert_eq!(record.total_points, 0);
        assert_eq!(record.current_level, LevelId::new("beginner"));
    }

    #[test]
    fn wire_field_names_are_stable() {
        let json = serde_json::to_string(&sample_record()).unwrap();

        assert!(json.contains("\"completed_lessons\""));
        assert!(json.contains("\"completed_modules\""));
        assert!(json.contains("\"quiz_scores\""));
        assert!(json.contains("\"exercise_scores\""));
        assert!(json.contains("\"total_points\""));
        assert!(json.contains("\"badges\""));
        assert!(json.contains("\"current_level\""));
    }

    #[test]
    fn partial_record_deserializes_with_defaults() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"completed_lessons":["l1"],"total_points":10}"#).unwrap();

        assert_eq!(record.completed_lessons, vec![LessonId::new("l1")]);
        assert_eq!(record.total_points, 10);
        assert!(record.badges.is_empty());
        assert_eq!(record.current_level, LevelId::new("beginner"));
    }
}
