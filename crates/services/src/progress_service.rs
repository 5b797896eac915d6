//! Owns the learner's progress snapshot and keeps it persisted.

use std::fmt;
use std::sync::Arc;

use course_core::engine;
use course_core::model::{
    CourseCatalog, LessonCompletion, LessonId, LevelId, ModuleCompletion, ModuleId, ProgressState,
    QuizId, QuizScoreRecord,
};
use storage::repository::{ProgressRecord, ProgressRepository};

use crate::error::ProgressError;

// ─── Progress Service ───────────────────────────────────────────────────────

/// Single owner of the learner's progress.
///
/// Mutations apply to the in-memory snapshot first and then write the whole
/// record out. When the write fails the snapshot keeps the change and the
/// error reports that persistence is behind; the next successful save
/// catches the store up.
pub struct ProgressService {
    catalog: Arc<CourseCatalog>,
    progress: ProgressState,
    repository: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    /// Loads the persisted record, or starts from the empty default.
    ///
    /// A missing record is the normal first run. A record that cannot be
    /// read or decoded also falls back to the default, with a warning, so
    /// a damaged store costs the saved progress rather than startup.
    pub async fn load_or_default(
        catalog: Arc<CourseCatalog>,
        repository: Arc<dyn ProgressRepository>,
    ) -> Self {
        let progress = match repository.load().await {
            Ok(Some(record)) => record.into_state(),
            Ok(None) => ProgressState::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load progress record, starting fresh");
                ProgressState::default()
            }
        };

        Self {
            catalog,
            progress,
            repository,
        }
    }

    /// Current progress snapshot
    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// Course content this service runs against
    #[must_use]
    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    // ─── Mutations ──────────────────────────────────────────────────────────

    /// Records a lesson completion and persists the updated record.
    ///
    /// Completing an already-completed lesson changes nothing and skips
    /// the write.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::Persistence`] when the write fails. The
    /// in-memory change is kept.
    pub async fn complete_lesson(
        &mut self,
        lesson_id: &LessonId,
        points: u32,
    ) -> Result<LessonCompletion, ProgressError> {
        let outcome = self.progress.complete_lesson(lesson_id.clone(), points);
        if outcome.newly_completed {
            tracing::debug!(lesson = %lesson_id, points, "lesson completed");
            self.persist().await?;
        }
        Ok(outcome)
    }

    /// Records a module completion and persists the updated record.
    ///
    /// Completing an already-completed module changes nothing and skips
    /// the write.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::Persistence`] when the write fails. The
    /// in-memory change is kept.
    pub async fn complete_module(
        &mut self,
        module_id: &ModuleId,
    ) -> Result<ModuleCompletion, ProgressError> {
        let outcome = self.progress.complete_module(module_id.clone());
        if outcome.newly_completed {
            tracing::debug!(module = %module_id, "module completed");
            self.persist().await?;
        }
        Ok(outcome)
    }

    /// Records a quiz score and persists the updated record.
    ///
    /// Always writes: a retake overwrites the stored score even when the
    /// new score equals the old one.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::Persistence`] when the write fails. The
    /// in-memory change is kept.
    pub async fn save_quiz_score(
        &mut self,
        quiz_id: &QuizId,
        score: u8,
    ) -> Result<QuizScoreRecord, ProgressError> {
        let outcome = self.progress.save_quiz_score(quiz_id.clone(), score);
        tracing::debug!(quiz = %quiz_id, score, "quiz score saved");
        self.persist().await?;
        Ok(outcome)
    }

    /// Records the level the learner moved to and persists the record.
    ///
    /// Setting the level that is already current changes nothing and skips
    /// the write. Returns whether the level changed.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::Persistence`] when the write fails. The
    /// in-memory change is kept.
    pub async fn set_current_level(&mut self, level_id: &LevelId) -> Result<bool, ProgressError> {
        let changed = self.progress.set_current_level(level_id.clone());
        if changed {
            tracing::debug!(level = %level_id, "current level changed");
            self.persist().await?;
        }
        Ok(changed)
    }

    async fn persist(&self) -> Result<(), ProgressError> {
        let record = ProgressRecord::from_state(&self.progress);
        self.repository.save(&record).await?;
        Ok(())
    }

    // ─── Derived Queries ────────────────────────────────────────────────────

    /// Completion percentage across every lesson in the course
    #[must_use]
    pub fn overall_progress(&self) -> u8 {
        engine::overall_progress(&self.catalog, &self.progress)
    }

    /// Completion percentage of one level's lessons
    #[must_use]
    pub fn level_progress(&self, level_id: &LevelId) -> u8 {
        engine::level_progress(&self.catalog, &self.progress, level_id)
    }

    /// Completion percentage of one module's lessons
    #[must_use]
    pub fn module_progress(&self, module_id: &ModuleId) -> u8 {
        engine::module_progress(&self.catalog, &self.progress, module_id)
    }

    /// Whether the learner's points open the given level
    #[must_use]
    pub fn is_level_unlocked(&self, level_id: &LevelId) -> bool {
        engine::is_level_unlocked(&self.catalog, &self.progress, level_id)
    }

    /// Whether the modules of the given level are open
    #[must_use]
    pub fn is_module_unlocked(&self, level_id: &LevelId) -> bool {
        engine::is_module_unlocked(&self.catalog, &self.progress, level_id)
    }
}

impl fmt::Debug for ProgressService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressService")
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
