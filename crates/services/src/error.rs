//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{CatalogError, LevelId, ModuleId};
use course_core::quiz::QuizError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors from progress mutations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    /// The in-memory snapshot was updated but the write to storage failed.
    /// The next successful save writes the full current state.
    #[error("progress update was not persisted")]
    Persistence(#[from] StorageError),
}

/// Errors from driving a module session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModuleFlowError {
    #[error("module {module} not found in level {level}")]
    ModuleNotFound { level: LevelId, module: ModuleId },

    #[error("lesson index {index} is out of range, module has {lessons} lessons")]
    LessonOutOfRange { index: usize, lessons: usize },

    #[error("module {0} has no quiz")]
    NoQuiz(ModuleId),

    #[error("current lesson requires a validated exercise")]
    ExerciseNotValidated,

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors from assembling the application services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
