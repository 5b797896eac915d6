//! Badge award rules.
//!
//! Rules are pure: they look at the state a mutation just produced plus the
//! badges already held, and return what was newly earned. The caller appends
//! the result to the held list, so a rule must never return a badge that is
//! already held.

use crate::model::BadgeId;

/// Badges the award rules know how to grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardBadge {
    /// First lesson ever completed
    FirstLesson,
    /// First module ever completed
    FirstModule,
    /// Any quiz finished with a perfect score
    QuizMaster,
}

impl StandardBadge {
    /// Stable identifier, matching the badge ids in course catalogs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstLesson => "first-lesson",
            Self::FirstModule => "first-module",
            Self::QuizMaster => "quiz-master",
        }
    }

    /// The [`BadgeId`] this rule grants
    #[must_use]
    pub fn id(self) -> BadgeId {
        BadgeId::new(self.as_str())
    }

    /// Looks up a standard badge from its identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first-lesson" => Some(Self::FirstLesson),
            "first-module" => Some(Self::FirstModule),
            "quiz-master" => Some(Self::QuizMaster),
            _ => None,
        }
    }

    /// All standard badges, in a fixed order
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::FirstLesson, Self::FirstModule, Self::QuizMaster]
    }
}

fn holds(badges_held: &[BadgeId], badge: StandardBadge) -> bool {
    badges_held.iter().any(|id| id.as_str() == badge.as_str())
}

/// Badges earned by having `completed_lessons` lessons completed.
///
/// Milestone counts use `>=` rather than `==` so a state that somehow skipped
/// past a milestone still earns the badge at the next opportunity.
///
/// ```
/// # use course_core::badges;
/// let earned = badges::lesson_completion_badges(1, &[]);
/// assert_eq!(earned.len(), 1);
/// assert_eq!(earned[0].as_str(), "first-lesson");
/// ```
#[must_use]
pub fn lesson_completion_badges(completed_lessons: usize, badges_held: &[BadgeId]) -> Vec<BadgeId> {
    let mut earned = Vec::new();
    if completed_lessons >= 1 && !holds(badges_held, StandardBadge::FirstLesson) {
        earned.push(StandardBadge::FirstLesson.id());
    }
    earned
}

/// Badges earned by having `completed_modules` modules completed.
#[must_use]
pub fn module_completion_badges(completed_modules: usize, badges_held: &[BadgeId]) -> Vec<BadgeId> {
    let mut earned = Vec::new();
    if completed_modules >= 1 && !holds(badges_held, StandardBadge::FirstModule) {
        earned.push(StandardBadge::FirstModule.id());
    }
    earned
}

/// Badges earned by a quiz score. `quiz-master` requires a perfect 100.
#[must_use]
pub fn quiz_score_badges(score: u8, badges_held: &[BadgeId]) -> Vec<BadgeId> {
    let mut earned = Vec::new();
    if score == 100 && !holds(badges_held, StandardBadge::QuizMaster) {
        earned.push(StandardBadge::QuizMaster.id());
    }
    earned
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
