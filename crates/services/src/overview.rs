//! Aggregate read models for dashboard views.
//!
//! Plain figures assembled on demand from the catalog and the progress
//! state. Nothing here is cached or formatted; embedding layers decide how
//! to render.

use course_core::engine;
use course_core::model::{Badge, CourseCatalog, LevelId, ModuleId, ProgressState};

/// Whole-course totals plus the learner's standing.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOverview {
    pub overall_percent: u8,
    pub total_points: u32,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub total_modules: usize,
    /// Sum of the numeric prefixes of module duration labels, in hours.
    pub total_duration_hours: f64,
    /// Earned badge definitions, in catalog order.
    pub earned_badges: Vec<Badge>,
}

/// Standing of one level, for level cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOverview {
    pub level_id: LevelId,
    pub percent: u8,
    pub unlocked: bool,
    pub required_points: u32,
    pub modules: Vec<ModuleOverview>,
}

/// Standing of one module inside a level card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOverview {
    pub module_id: ModuleId,
    pub percent: u8,
    pub completed: bool,
    pub lesson_count: usize,
    /// Display label straight from the catalog, such as `"2h"`.
    pub duration: String,
}

/// Builds the whole-course overview.
#[must_use]
pub fn course_overview(catalog: &CourseCatalog, state: &ProgressState) -> CourseOverview {
    let total_duration_hours = catalog
        .levels
        .iter()
        .flat_map(|level| level.modules.iter())
        .map(|module| duration_hours(&module.duration))
        .sum();

    CourseOverview {
        overall_percent: engine::overall_progress(catalog, state),
        total_points: state.total_points(),
        completed_lessons: state.completed_lessons().len(),
        total_lessons: catalog.total_lessons(),
        total_modules: catalog.total_modules(),
        total_duration_hours,
        earned_badges: catalog
            .badges
            .iter()
            .filter(|badge| state.has_badge(&badge.id))
            .cloned()
            .collect(),
    }
}

/// Builds one overview per catalog level, in catalog order.
#[must_use]
pub fn level_overviews(catalog: &CourseCatalog, state: &ProgressState) -> Vec<LevelOverview> {
    catalog
        .levels
        .iter()
        .map(|level| LevelOverview {
            level_id: level.id.clone(),
            percent: engine::level_progress(catalog, state, &level.id),
            unlocked: engine::is_level_unlocked(catalog, state, &level.id),
            required_points: level.required_points,
            modules: level
                .modules
                .iter()
                .map(|module| ModuleOverview {
                    module_id: module.id.clone(),
                    percent: engine::module_progress(catalog, state, &module.id),
                    completed: state.is_module_completed(&module.id),
                    lesson_count: module.lessons.len(),
                    duration: module.duration.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Hours named by the leading number of a duration label.
///
/// `"2h30"` counts as 2 and `"1.5h"` as 1.5. A label with no leading
/// number counts as 0.
#[must_use]
pub fn duration_hours(duration: &str) -> f64 {
    let trimmed = duration.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        if ch.is_ascii_digit() {
            end = idx + ch.len_utf8();
        } else if ch == '.' && !seen_dot {
            seen_dot = true;
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
