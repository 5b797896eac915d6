#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod module_flow;
pub mod overview;
pub mod progress_service;

pub use app_services::AppServices;
pub use error::{AppServicesError, ModuleFlowError, ProgressError};
pub use module_flow::{LessonCompletionResult, ModuleSession, QuizFlowResult};
pub use overview::{
    CourseOverview, LevelOverview, ModuleOverview, course_overview, duration_hours,
    level_overviews,
};
pub use progress_service::ProgressService;
