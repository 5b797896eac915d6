mod catalog;
mod ids;
mod progress;

pub use catalog::{
    Badge, CatalogError, CourseCatalog, DEFAULT_PASSING_SCORE, Exercise, Lesson, LessonKind,
    Level, Module, Question, Quiz,
};
pub use ids::{BadgeId, ExerciseId, LessonId, LevelId, ModuleId, QuestionId, QuizId};

pub use progress::{
    DEFAULT_LEVEL, LessonCompletion, ModuleCompletion, ProgressState, QuizScoreRecord,
};
