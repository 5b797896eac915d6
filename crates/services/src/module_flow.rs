//! One learner's visit to a module: lesson navigation, exercise gating,
//! the quiz, and the module completion check.

use std::fmt;

use course_core::model::{
    Lesson, LessonCompletion, LevelId, Module, ModuleCompletion, ModuleId, QuizScoreRecord,
};
use course_core::quiz::QuizSession;

use crate::error::ModuleFlowError;
use crate::progress_service::ProgressService;

// ─── Results ────────────────────────────────────────────────────────────────

/// What happened when the active lesson was completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletionResult {
    pub lesson: LessonCompletion,
    /// Present when the module completion check ran, whether or not the
    /// module was newly completed.
    pub module: Option<ModuleCompletion>,
    /// Index the session advanced to, unless the lesson was the last one.
    pub advanced_to: Option<usize>,
}

/// What happened when a finished quiz attempt was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizFlowResult {
    pub saved: QuizScoreRecord,
    pub passed: bool,
    /// Present when the module completion check ran.
    pub module: Option<ModuleCompletion>,
}

// ─── Module Session ─────────────────────────────────────────────────────────

/// Per-visit state for working through one module.
///
/// Holds its own copy of the module content plus the transient bits the
/// persisted record never sees: which lesson is active and whether the
/// active lesson's exercise has been validated this visit.
#[derive(Clone)]
pub struct ModuleSession {
    level_id: LevelId,
    module: Module,
    lesson_index: usize,
    exercise_validated: bool,
}

impl ModuleSession {
    /// Opens a session on the given module.
    ///
    /// The active lesson starts at the first lesson the learner has not
    /// completed yet, or at the first lesson when everything is done.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleFlowError::ModuleNotFound`] when the level does not
    /// exist or does not contain the module.
    pub fn open(
        service: &ProgressService,
        level_id: &LevelId,
        module_id: &ModuleId,
    ) -> Result<Self, ModuleFlowError> {
        let module = service
            .catalog()
            .find_level(level_id)
            .and_then(|level| level.modules.iter().find(|module| &module.id == module_id))
            .ok_or_else(|| ModuleFlowError::ModuleNotFound {
                level: level_id.clone(),
                module: module_id.clone(),
            })?
            .clone();

        let lesson_index = module
            .lessons
            .iter()
            .position(|lesson| !service.progress().is_lesson_completed(&lesson.id))
            .unwrap_or(0);

        Ok(Self {
            level_id: level_id.clone(),
            module,
            lesson_index,
            exercise_validated: false,
        })
    }

    /// Level this session was opened under
    #[must_use]
    pub fn level_id(&self) -> &LevelId {
        &self.level_id
    }

    /// Content of the module being worked through
    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Index of the active lesson
    #[must_use]
    pub fn lesson_index(&self) -> usize {
        self.lesson_index
    }

    /// The active lesson, if the module has any lessons
    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.module.lessons.get(self.lesson_index)
    }

    /// Whether the active lesson's exercise was validated this visit
    #[must_use]
    pub fn exercise_validated(&self) -> bool {
        self.exercise_validated
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Jumps to the lesson at `index` and resets the exercise flag.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleFlowError::LessonOutOfRange`] when the index does
    /// not name a lesson of this module.
    pub fn select_lesson(&mut self, index: usize) -> Result<(), ModuleFlowError> {
        if index >= self.module.lessons.len() {
            return Err(ModuleFlowError::LessonOutOfRange {
                index,
                lessons: self.module.lessons.len(),
            });
        }
        self.lesson_index = index;
        self.exercise_validated = false;
        Ok(())
    }

    /// Moves to the next lesson. Returns false when already on the last.
    pub fn next_lesson(&mut self) -> bool {
        if self.lesson_index + 1 < self.module.lessons.len() {
            self.lesson_index += 1;
            self.exercise_validated = false;
            true
        } else {
            false
        }
    }

    /// Moves to the previous lesson. Returns false when already on the first.
    pub fn previous_lesson(&mut self) -> bool {
        if self.lesson_index > 0 {
            self.lesson_index -= 1;
            self.exercise_validated = false;
            true
        } else {
            false
        }
    }

    // ─── Exercise Gate ──────────────────────────────────────────────────────

    /// Marks the active lesson's exercise as validated for this visit.
    ///
    /// The flag is cleared by any navigation and is never persisted; each
    /// visit revalidates.
    pub fn mark_exercise_validated(&mut self) {
        self.exercise_validated = true;
    }

    /// Whether the active lesson can be completed right now.
    ///
    /// Lessons without an exercise always can. Lessons with one need the
    /// exercise validated first, unless the lesson is already completed.
    #[must_use]
    pub fn can_complete_current_lesson(&self, service: &ProgressService) -> bool {
        match self.current_lesson() {
            Some(lesson) => {
                service.progress().is_lesson_completed(&lesson.id)
                    || lesson.exercise.is_none()
                    || self.exercise_validated
            }
            None => false,
        }
    }

    // ─── Completion ─────────────────────────────────────────────────────────

    /// Whether every lesson of this module is completed
    #[must_use]
    pub fn all_lessons_completed(&self, service: &ProgressService) -> bool {
        self.module
            .lessons
            .iter()
            .all(|lesson| service.progress().is_lesson_completed(&lesson.id))
    }

    /// Whether the module quiz is passed, or absent.
    ///
    /// Only the latest stored score counts; a failed retake of a quiz that
    /// was passed before takes the pass away again.
    #[must_use]
    pub fn quiz_passed(&self, service: &ProgressService) -> bool {
        match &self.module.quiz {
            Some(quiz) => service
                .progress()
                .quiz_score(&quiz.id)
                .is_some_and(|score| score >= quiz.passing_score),
            None => true,
        }
    }

    /// Completes the active lesson, runs the module completion check, and
    /// advances to the next lesson when there is one.
    ///
    /// Completing a lesson that is already completed is a no-op on the
    /// record but still advances the session.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleFlowError::ExerciseNotValidated`] when the lesson
    /// carries an exercise that has not been validated this visit, and
    /// [`ModuleFlowError::Progress`] when persisting fails.
    pub async fn complete_current_lesson(
        &mut self,
        service: &mut ProgressService,
    ) -> Result<LessonCompletionResult, ModuleFlowError> {
        let Some(lesson) = self.current_lesson() else {
            return Err(ModuleFlowError::LessonOutOfRange {
                index: self.lesson_index,
                lessons: self.module.lessons.len(),
            });
        };
        let lesson_id = lesson.id.clone();
        let points = lesson.points;
        let has_exercise = lesson.exercise.is_some();

        let already_completed = service.progress().is_lesson_completed(&lesson_id);
        if !already_completed && has_exercise && !self.exercise_validated {
            return Err(ModuleFlowError::ExerciseNotValidated);
        }

        let lesson_outcome = service.complete_lesson(&lesson_id, points).await?;
        let module_outcome = self.check_module_completion(service).await?;

        let advanced_to = if self.lesson_index + 1 < self.module.lessons.len() {
            self.lesson_index += 1;
            self.exercise_validated = false;
            Some(self.lesson_index)
        } else {
            None
        };

        Ok(LessonCompletionResult {
            lesson: lesson_outcome,
            module: module_outcome,
            advanced_to,
        })
    }

    /// Records a finished quiz attempt and runs the module completion check.
    ///
    /// The score is stored whether or not it passes.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleFlowError::NoQuiz`] when the module has no quiz, and
    /// [`ModuleFlowError::Progress`] when persisting fails.
    pub async fn record_quiz_result(
        &self,
        service: &mut ProgressService,
        score: u8,
    ) -> Result<QuizFlowResult, ModuleFlowError> {
        let Some(quiz) = &self.module.quiz else {
            return Err(ModuleFlowError::NoQuiz(self.module.id.clone()));
        };
        let passed = score >= quiz.passing_score;

        let saved = service.save_quiz_score(&quiz.id, score).await?;
        let module = self.check_module_completion(service).await?;

        Ok(QuizFlowResult {
            saved,
            passed,
            module,
        })
    }

    /// Starts an attempt on the module quiz.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleFlowError::NoQuiz`] when the module has no quiz, and
    /// [`ModuleFlowError::Quiz`] when the quiz has no questions.
    pub fn start_quiz(&self) -> Result<QuizSession, ModuleFlowError> {
        let Some(quiz) = &self.module.quiz else {
            return Err(ModuleFlowError::NoQuiz(self.module.id.clone()));
        };
        Ok(QuizSession::new(quiz.clone())?)
    }

    /// Runs the module mutation when both completion conditions hold.
    async fn check_module_completion(
        &self,
        service: &mut ProgressService,
    ) -> Result<Option<ModuleCompletion>, ModuleFlowError> {
        if self.all_lessons_completed(service) && self.quiz_passed(service) {
            let outcome = service.complete_module(&self.module.id).await?;
            return Ok(Some(outcome));
        }
        Ok(None)
    }
}

impl fmt::Debug for ModuleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSession")
            .field("level_id", &self.level_id)
            .field("module_id", &self.module.id)
            .field("lesson_index", &self.lesson_index)
            .field("exercise_validated", &self.exercise_validated)
            .finish_non_exhaustive()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
