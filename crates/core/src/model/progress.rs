use std::collections::HashMap;

use crate::badges;
use crate::model::ids::{BadgeId, ExerciseId, LessonId, LevelId, ModuleId, QuizId};

/// Level a fresh learner starts on.
pub const DEFAULT_LEVEL: &str = "beginner";

// ─── Mutation Outcomes ─────────────────────────────────────────────────────────

/// What happened when a lesson completion was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    /// False when the lesson was already completed and nothing changed.
    pub newly_completed: bool,
    /// Points added to the running total, 0 for a repeat completion.
    pub points_awarded: u32,
    /// Badges earned by this completion, in award order.
    pub badges_awarded: Vec<BadgeId>,
}

/// What happened when a module completion was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCompletion {
    /// False when the module was already completed and nothing changed.
    pub newly_completed: bool,
    /// Badges earned by this completion, in award order.
    pub badges_awarded: Vec<BadgeId>,
}

/// What happened when a quiz score was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizScoreRecord {
    /// Score the new value replaced, if the quiz had been attempted before.
    pub previous_score: Option<u8>,
    /// Badges earned by this score, in award order.
    pub badges_awarded: Vec<BadgeId>,
}

// ─── Progress State ────────────────────────────────────────────────────────────

/// Everything the learner has done, independent of course content.
///
/// Completion sets are append-only and duplicate-free, quiz scores keep the
/// latest attempt, and `total_points` only ever grows. Fields are private so
/// every change goes through a mutation that upholds those invariants and
/// runs the badge rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    completed_lessons: Vec<LessonId>,
    completed_modules: Vec<ModuleId>,
    quiz_scores: HashMap<QuizId, u8>,
    exercise_scores: HashMap<ExerciseId, u8>,
    total_points: u32,
    badges: Vec<BadgeId>,
    current_level: LevelId,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            completed_lessons: Vec::new(),
            completed_modules: Vec::new(),
            quiz_scores: HashMap::new(),
            exercise_scores: HashMap::new(),
            total_points: 0,
            badges: Vec::new(),
            current_level: LevelId::new(DEFAULT_LEVEL),
        }
    }
}

impl ProgressState {
    /// Rebuilds a state from persisted parts.
    ///
    /// Persisted data is not trusted to uphold the invariants: completion
    /// sets and badges are deduplicated keeping the first occurrence, and
    /// scores are clamped to 100. Entries referencing content ids that no
    /// longer exist are kept; derivations treat them as inert.
    #[must_use]
    pub fn from_persisted(
        completed_lessons: Vec<LessonId>,
        completed_modules: Vec<ModuleId>,
        quiz_scores: HashMap<QuizId, u8>,
        exercise_scores: HashMap<ExerciseId, u8>,
        total_points: u32,
        badges: Vec<BadgeId>,
        current_level: LevelId,
    ) -> Self {
        Self {
            completed_lessons: dedup_preserving_order(completed_lessons),
            completed_modules: dedup_preserving_order(completed_modules),
            quiz_scores: clamp_scores(quiz_scores),
            exercise_scores: clamp_scores(exercise_scores),
            total_points,
            badges: dedup_preserving_order(badges),
            current_level,
        }
    }

    // ─── Mutations ─────────────────────────────────────────────────────────

    /// Records a lesson as completed and credits its points.
    ///
    /// Completing an already-completed lesson changes nothing: no points,
    /// no badges, `newly_completed` false.
    pub fn complete_lesson(&mut self, lesson_id: LessonId, points: u32) -> LessonCompletion {
        if self.completed_lessons.contains(&lesson_id) {
            return LessonCompletion {
                newly_completed: false,
                points_awarded: 0,
                badges_awarded: Vec::new(),
            };
        }

        self.completed_lessons.push(lesson_id);
        self.total_points = self.total_points.saturating_add(points);
        let badges_awarded = self.award(badges::lesson_completion_badges(
            self.completed_lessons.len(),
            &self.badges,
        ));

        LessonCompletion {
            newly_completed: true,
            points_awarded: points,
            badges_awarded,
        }
    }

    /// Records a module as completed.
    ///
    /// Completing an already-completed module changes nothing.
    pub fn complete_module(&mut self, module_id: ModuleId) -> ModuleCompletion {
        if self.completed_modules.contains(&module_id) {
            return ModuleCompletion {
                newly_completed: false,
                badges_awarded: Vec::new(),
            };
        }

        self.completed_modules.push(module_id);
        let badges_awarded = self.award(badges::module_completion_badges(
            self.completed_modules.len(),
            &self.badges,
        ));

        ModuleCompletion {
            newly_completed: true,
            badges_awarded,
        }
    }

    /// Records a quiz score, replacing any earlier attempt.
    ///
    /// Scores do not accumulate and a lower retry overwrites a higher
    /// earlier score. Badges already earned are never revoked.
    pub fn save_quiz_score(&mut self, quiz_id: QuizId, score: u8) -> QuizScoreRecord {
        let previous_score = self.quiz_scores.insert(quiz_id, score);
        let badges_awarded = self.award(badges::quiz_score_badges(score, &self.badges));

        QuizScoreRecord {
            previous_score,
            badges_awarded,
        }
    }

    /// Sets the level the learner is currently browsing.
    ///
    /// Informational only; unlock checks always go through accumulated
    /// points. Returns false when the level was already current.
    pub fn set_current_level(&mut self, level_id: LevelId) -> bool {
        if self.current_level == level_id {
            return false;
        }
        self.current_level = level_id;
        true
    }

    fn award(&mut self, earned: Vec<BadgeId>) -> Vec<BadgeId> {
        self.badges.extend(earned.iter().cloned());
        earned
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    /// Completed lesson ids in completion order
    #[must_use]
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed_lessons
    }

    /// Completed module ids in completion order
    #[must_use]
    pub fn completed_modules(&self) -> &[ModuleId] {
        &self.completed_modules
    }

    /// Whether the lesson has been completed
    #[must_use]
    pub fn is_lesson_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    /// Whether the module has been completed
    #[must_use]
    pub fn is_module_completed(&self, module_id: &ModuleId) -> bool {
        self.completed_modules.contains(module_id)
    }

    /// Latest recorded score for the quiz, if attempted
    #[must_use]
    pub fn quiz_score(&self, quiz_id: &QuizId) -> Option<u8> {
        self.quiz_scores.get(quiz_id).copied()
    }

    /// All recorded quiz scores
    #[must_use]
    pub fn quiz_scores(&self) -> &HashMap<QuizId, u8> {
        &self.quiz_scores
    }

    /// All recorded exercise scores. Reserved: nothing writes these yet
    #[must_use]
    pub fn exercise_scores(&self) -> &HashMap<ExerciseId, u8> {
        &self.exercise_scores
    }

    /// Accumulated points across all completed lessons
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    /// Earned badge ids in award order
    #[must_use]
    pub fn badges(&self) -> &[BadgeId] {
        &self.badges
    }

    /// Whether the badge has been earned
    #[must_use]
    pub fn has_badge(&self, badge_id: &BadgeId) -> bool {
        self.badges.contains(badge_id)
    }

    /// Level the learner is currently on. Informational only, never used
    /// to gate access
    #[must_use]
    pub fn current_level(&self) -> &LevelId {
        &self.current_level
    }
}

fn dedup_preserving_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn clamp_scores<K>(scores: HashMap<K, u8>) -> HashMap<K, u8>
where
    K: std::hash::Hash + Eq,
{
    scores
        .into_iter()
        .map(|(key, score)| (key, score.min(100)))
        .collect()
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
