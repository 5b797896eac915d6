use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{BadgeId, LessonId, LevelId, ModuleId, QuestionId, QuizId};

/// Passing score applied when course content does not specify one.
pub const DEFAULT_PASSING_SCORE: u8 = 70;

// ─── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised by [`CourseCatalog::validate`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate level id: {0}")]
    DuplicateLevel(LevelId),

    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(LessonId),

    #[error("duplicate quiz id: {0}")]
    DuplicateQuiz(QuizId),

    #[error("duplicate question id {question} in quiz {quiz}")]
    DuplicateQuestion { quiz: QuizId, question: QuestionId },

    #[error("duplicate badge id: {0}")]
    DuplicateBadge(BadgeId),

    #[error("quiz {0} has no questions")]
    EmptyQuiz(QuizId),

    #[error("quiz {quiz} declares passing score {score}, expected 0..=100")]
    PassingScoreOutOfRange { quiz: QuizId, score: u8 },

    #[error("question {question} marks option {correct} correct but only has {options} options")]
    CorrectOptionOutOfRange {
        question: QuestionId,
        correct: usize,
        options: usize,
    },
}

// ─── Catalog Types ─────────────────────────────────────────────────────────────

/// A difficulty tier of the course, unlocked by accumulated points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: LevelId,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Total points a learner must hold before this level unlocks.
    pub required_points: u32,
    pub modules: Vec<Module>,
}

/// A themed group of lessons inside a level, optionally closed by a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    /// Free-form duration label shown to learners, e.g. `"2h30"`.
    pub duration: String,
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub quiz: Option<Quiz>,
}

/// A single unit of content worth a fixed number of points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    pub points: u32,
    pub content: String,
    #[serde(default)]
    pub exercise: Option<Exercise>,
}

/// Whether a lesson is reading material or hands-on practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Theory,
    Practice,
}

/// A coding exercise attached to a practice lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub instructions: String,
    pub starter_code: String,
    pub solution: String,
    pub tests: String,
}

/// A multiple-choice quiz closing a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    pub questions: Vec<Question>,
    /// Minimum percentage score required to pass, 0..=100.
    #[serde(default = "default_passing_score")]
    pub passing_score: u8,
}

/// One multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct: usize,
    pub explanation: String,
}

/// A badge learners can earn through progress milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub icon: String,
}

fn default_passing_score() -> u8 {
    DEFAULT_PASSING_SCORE
}

// ─── Course Catalog ────────────────────────────────────────────────────────────

/// The full course content tree: levels, their modules and lessons, plus the
/// badge definitions.
///
/// The catalog is immutable at runtime. Progress state references it by id
/// only, so the two can evolve independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCatalog {
    pub levels: Vec<Level>,
    pub badges: Vec<Badge>,
}

impl CourseCatalog {
    /// Checks the structural invariants of the content tree.
    ///
    /// Ids must be unique within their scope (levels, modules, lessons,
    /// quizzes and badges across the whole catalog, questions within their
    /// quiz), every quiz needs at least one question and a passing score in
    /// `0..=100`, and every question's correct index must point at one of
    /// its options.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut level_ids = HashSet::new();
        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        let mut quiz_ids = HashSet::new();

        for level in &self.levels {
            if !level_ids.insert(&level.id) {
                return Err(CatalogError::DuplicateLevel(level.id.clone()));
            }
            for module in &level.modules {
                if !module_ids.insert(&module.id) {
                    return Err(CatalogError::DuplicateModule(module.id.clone()));
                }
                for lesson in &module.lessons {
                    if !lesson_ids.insert(&lesson.id) {
                        return Err(CatalogError::DuplicateLesson(lesson.id.clone()));
                    }
                }
                if let Some(quiz) = &module.quiz {
                    if !quiz_ids.insert(&quiz.id) {
                        return Err(CatalogError::DuplicateQuiz(quiz.id.clone()));
                    }
                    Self::validate_quiz(quiz)?;
                }
            }
        }

        let mut badge_ids = HashSet::new();
        for badge in &self.badges {
            if !badge_ids.insert(&badge.id) {
                return Err(CatalogError::DuplicateBadge(badge.id.clone()));
            }
        }

        Ok(())
    }

    fn validate_quiz(quiz: &Quiz) -> Result<(), CatalogError> {
        if quiz.questions.is_empty() {
            return Err(CatalogError::EmptyQuiz(quiz.id.clone()));
        }
        if quiz.passing_score > 100 {
            return Err(CatalogError::PassingScoreOutOfRange {
                quiz: quiz.id.clone(),
                score: quiz.passing_score,
            });
        }
        let mut question_ids = HashSet::new();
        for question in &quiz.questions {
            if !question_ids.insert(&question.id) {
                return Err(CatalogError::DuplicateQuestion {
                    quiz: quiz.id.clone(),
                    question: question.id.clone(),
                });
            }
            if question.correct >= question.options.len() {
                return Err(CatalogError::CorrectOptionOutOfRange {
                    question: question.id.clone(),
                    correct: question.correct,
                    options: question.options.len(),
                });
            }
        }
        Ok(())
    }

    /// Finds a level by id
    #[must_use]
    pub fn find_level(&self, id: &LevelId) -> Option<&Level> {
        self.levels.iter().find(|level| &level.id == id)
    }

    /// Finds a module by id, searching every level
    #[must_use]
    pub fn find_module(&self, id: &ModuleId) -> Option<&Module> {
        self.levels
            .iter()
            .flat_map(|level| level.modules.iter())
            .find(|module| &module.id == id)
    }

    /// Finds a lesson by id, searching the whole catalog
    #[must_use]
    pub fn find_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons().find(|lesson| &lesson.id == id)
    }

    /// Finds a badge definition by id
    #[must_use]
    pub fn find_badge(&self, id: &BadgeId) -> Option<&Badge> {
        self.badges.iter().find(|badge| &badge.id == id)
    }

    /// Iterates over every lesson in the catalog, in level order
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.levels.iter().flat_map(Level::lessons)
    }

    /// Total number of lessons across all levels
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons().count()
    }

    /// Total number of modules across all levels
    #[must_use]
    pub fn total_modules(&self) -> usize {
        self.levels.iter().map(|level| level.modules.len()).sum()
    }
}

impl Level {
    /// Iterates over every lesson in this level, in module order
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|module| module.lessons.iter())
    }

    /// Number of lessons in this level
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons().count()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
