//! Pure derivations over a course catalog and a progress state.
//!
//! Nothing here mutates or caches. Every figure is recomputed on demand from
//! the two inputs, so callers never have to invalidate anything.

use crate::model::{CourseCatalog, LevelId, ModuleId, ProgressState};

/// Overall course completion as a whole percentage.
///
/// Counts the completed-lesson set against every lesson in the catalog.
/// An empty catalog reports 0.
///
/// ```
/// # use course_core::engine;
/// # use course_core::model::{CourseCatalog, ProgressState};
/// let catalog = CourseCatalog { levels: Vec::new(), badges: Vec::new() };
/// let state = ProgressState::default();
/// assert_eq!(engine::overall_progress(&catalog, &state), 0);
/// ```
#[must_use]
pub fn overall_progress(catalog: &CourseCatalog, state: &ProgressState) -> u8 {
    percent(state.completed_lessons().len(), catalog.total_lessons())
}

/// Completion of one level as a whole percentage.
///
/// Unknown levels and levels without lessons report 0.
#[must_use]
pub fn level_progress(catalog: &CourseCatalog, state: &ProgressState, level_id: &LevelId) -> u8 {
    let Some(level) = catalog.find_level(level_id) else {
        return 0;
    };
    let completed = level
        .lessons()
        .filter(|lesson| state.is_lesson_completed(&lesson.id))
        .count();
    percent(completed, level.lesson_count())
}

/// Completion of one module as a whole percentage.
///
/// Unknown modules and modules without lessons report 0.
#[must_use]
pub fn module_progress(catalog: &CourseCatalog, state: &ProgressState, module_id: &ModuleId) -> u8 {
    let Some(module) = catalog.find_module(module_id) else {
        return 0;
    };
    let completed = module
        .lessons
        .iter()
        .filter(|lesson| state.is_lesson_completed(&lesson.id))
        .count();
    percent(completed, module.lessons.len())
}

/// Whether a level is open to the learner.
///
/// A level unlocks once accumulated points reach its required points, and it
/// never relocks. Unknown levels are locked.
#[must_use]
pub fn is_level_unlocked(catalog: &CourseCatalog, state: &ProgressState, level_id: &LevelId) -> bool {
    catalog
        .find_level(level_id)
        .is_some_and(|level| state.total_points() >= level.required_points)
}

/// Whether the modules of a level are open to the learner.
///
/// Takes the owning level's id, not a module id: unlocking is a level-wide
/// gate, so this is defined identically to [`is_level_unlocked`]. Callers
/// wanting a stricter per-module gate must layer their own.
#[must_use]
pub fn is_module_unlocked(
    catalog: &CourseCatalog,
    state: &ProgressState,
    level_id: &LevelId,
) -> bool {
    is_level_unlocked(catalog, state, level_id)
}

/// Round-half-up whole percentage, clamped to 100.
///
/// The clamp matters when a persisted state references lessons that no
/// longer exist in the catalog: the completed set can then outgrow the total.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = completed as f64 / total as f64;
    (ratio * 100.0).round().min(100.0) as u8
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lesson, LessonId, LessonKind, Level, Module};

    fn lesson(id: &str, points: u32) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            title: format!("Lesson {id}"),
            kind: LessonKind::Theory,
            points,
            content: String::new(),
            exercise: None,
        }
    }

    fn module(id: &str, lessons: Vec<Lesson>) -> Module {
        Module {
            id: ModuleId::new(id),
            title: format!("Module {id}"),
            description: String::new(),
            duration: "1h".to_string(),
            lessons,
            quiz: None,
        }
    }

    fn level(id: &str, required_points: u32, modules: Vec<Module>) -> Level {
        Level {
            id: LevelId::new(id),
            title: format!("Level {id}"),
            description: String::new(),
            icon: "🌱".to_string(),
            required_points,
            modules,
        }
    }

    fn sample_catalog() -> CourseCatalog {
        CourseCatalog {
            levels: vec![
                level(
                    "beginner",
                    0,
                    vec![module("m1", vec![lesson("l1", 10), lesson("l2", 20)])],
                ),
                level(
                    "intermediate",
                    30,
                    vec![module(
                        "m2",
                        vec![lesson("l3", 15), lesson("l4", 15), lesson("l5", 20)],
                    )],
                ),
            ],
            badges: Vec::new(),
        }
    }

    #[test]
    fn test_overall_progress_counts_all_levels() {
        let catalog = sample_catalog();
        let mut state = ProgressState::default();
        state.complete_lesson(LessonId::new("l1"), 10);

        // 1 of 5 lessons
        assert_eq!(overall_progress(&catalog, &state), 20);
    }

    #[test]
    fn test_level_progress_halfway() {
        let catalog = sample_catalog();
        let mut state = ProgressState::default();
        state.complete_lesson(LessonId::new("l1"), 10);

        assert_eq!(level_progress(&catalog, &state, &LevelId::new("beginner")), 50);
        assert_eq!(
            level_progress(&catalog, &state, &LevelId::new("intermediate")),
            0
        );
    }

    #[test]
    fn test_thirds_round_half_up() {
        let catalog = sample_catalog();
        let mut state = ProgressState::default();
        let m2 = ModuleId::new("m2");

        state.complete_lesson(LessonId::new("l3"), 15);
        assert_eq!(module_progress(&catalog, &state, &m2), 33);

        state.complete_lesson(LessonId::new("l4"), 15);
        assert_eq!(module_progress(&catalog, &state, &m2), 67);
    }

    #[test]
    fn test_unknown_ids_report_zero() {
        let catalog = sample_catalog();
        let state = ProgressState::default();

        assert_eq!(level_progress(&catalog, &state, &LevelId::new("expert")), 0);
        assert_eq!(module_progress(&catalog, &state, &ModuleId::new("m9")), 0);
    }

    #[test]
    fn test_level_without_lessons_reports_zero() {
        let catalog = CourseCatalog {
            levels: vec![level("empty", 0, vec![module("m0", Vec::new())])],
            badges: Vec::new(),
        };
        let state = ProgressState::default();

        assert_eq!(level_progress(&catalog, &state, &LevelId::new("empty")), 0);
        assert_eq!(module_progress(&catalog, &state, &ModuleId::new("m0")), 0);
    }

    #[test]
    fn test_unlock_at_exact_threshold() {
        let catalog = sample_catalog();
        let mut state = ProgressState::default();
        let intermediate = LevelId::new("intermediate");

        state.complete_lesson(LessonId::new("l1"), 10);
        assert!(!is_level_unlocked(&catalog, &state, &intermediate));

        state.complete_lesson(LessonId::new("l2"), 20);
        assert!(is_level_unlocked(&catalog, &state, &intermediate));
    }

    #[test]
    fn test_one_point_below_threshold_stays_locked() {
        let catalog = sample_catalog();
        let mut state = ProgressState::default();
        let intermediate = LevelId::new("intermediate");

        state.complete_lesson(LessonId::new("l1"), 29);
        assert!(!is_level_unlocked(&catalog, &state, &intermediate));

        state.complete_lesson(LessonId::new("l2"), 1);
        assert!(is_level_unlocked(&catalog, &state, &intermediate));
    }

    #[test]
    fn test_zero_point_level_is_open_from_the_start() {
        let catalog = sample_catalog();
        let state = ProgressState::default();

        assert!(is_level_unlocked(&catalog, &state, &LevelId::new("beginner")));
    }

    #[test]
    fn test_unknown_level_is_locked() {
        let catalog = sample_catalog();
        let state = ProgressState::default();

        assert!(!is_level_unlocked(&catalog, &state, &LevelId::new("expert")));
        assert!(!is_module_unlocked(&catalog, &state, &LevelId::new("expert")));
    }

    #[test]
    fn test_module_unlock_follows_level_unlock() {
        let catalog = sample_catalog();
        let mut state = ProgressState::default();
        let intermediate = LevelId::new("intermediate");

        state.complete_lesson(LessonId::new("l1"), 10);
        state.complete_lesson(LessonId::new("l2"), 20);

        assert_eq!(
            is_module_unlocked(&catalog, &state, &intermediate),
            is_level_unlocked(&catalog, &state, &intermediate)
        );
        assert!(is_module_unlocked(&catalog, &state, &intermediate));
    }

    #[test]
    fn test_stale_completed_lessons_never_push_past_100() {
        let catalog = CourseCatalog {
            levels: vec![level("beginner", 0, vec![module("m1", vec![lesson("l1", 10)])])],
            badges: Vec::new(),
        };
        let state = ProgressState::from_persisted(
            vec![
                LessonId::new("l1"),
                LessonId::new("gone-1"),
                LessonId::new("gone-2"),
            ],
            Vec::new(),
            std::collections::HashMap::new(),
            std::collections::HashMap::new(),
            10,
            Vec::new(),
            LevelId::new("beginner"),
        );

        assert_eq!(overall_progress(&catalog, &state), 100);
    }
}
