//! Single-attempt quiz state machine.
//!
//! One [`QuizSession`] drives one attempt at one quiz: present a question,
//! accept a selection, grade it, move on. Completion is reported exactly
//! once, by the [`QuizSession::advance`] call that grades the final
//! question; the embedding flow records the score from that report.

use std::fmt;

use thiserror::Error;

use crate::engine;
use crate::model::{Question, QuestionId, Quiz, QuizId};

// ─── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised by [`QuizSession`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("no option selected for the current question")]
    NoSelection,

    #[error("option {option} is out of range, question has {options} options")]
    OptionOutOfRange { option: usize, options: usize },

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("current question has not been answered yet")]
    NotAnswered,

    #[error("quiz attempt is already complete")]
    QuizComplete,
}

// ─── Phases and Reports ────────────────────────────────────────────────────────

/// Where an attempt currently stands.
///
/// `question` is an index into the quiz's question list and is always in
/// bounds while the attempt is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Showing a question, selection still open.
    Presenting {
        question: usize,
        selected: Option<usize>,
    },
    /// Selection has been graded; correctness and explanation are visible.
    Answered { question: usize, selected: usize },
    /// Every question graded, final score fixed.
    Completed { score: u8 },
}

/// One graded question, in answer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub is_correct: bool,
}

/// What an [`QuizSession::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvance {
    /// Moved to the question at this index.
    NextQuestion(usize),
    /// Graded the last question; the attempt is over. Reported once.
    Completed { score: u8, passed: bool },
}

/// Read-only snapshot of how far the attempt has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Share of questions graded so far, as a whole percentage.
    pub percent: u8,
    pub is_complete: bool,
}

// ─── Quiz Session ──────────────────────────────────────────────────────────────

/// A single attempt at one quiz.
///
/// Owns a copy of the quiz content for the attempt's lifetime. The attempt
/// walks the questions in order: select, submit, advance. Nothing is
/// persisted here; scores leave through the completion report.
#[derive(Clone)]
pub struct QuizSession {
    quiz: Quiz,
    phase: QuizPhase,
    answers: Vec<AnsweredQuestion>,
}

impl QuizSession {
    /// Starts an attempt at the first question.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NoQuestions`] for a quiz without questions.
    pub fn new(quiz: Quiz) -> Result<Self, QuizError> {
        if quiz.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            quiz,
            phase: QuizPhase::Presenting {
                question: 0,
                selected: None,
            },
            answers: Vec::new(),
        })
    }

    /// Selects (or re-selects) an option for the current question.
    ///
    /// Has no effect once the current question is answered or the attempt is
    /// complete; changing one's mind before submitting is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::OptionOutOfRange`] when `option` does not index
    /// one of the current question's options.
    pub fn select_option(&mut self, option: usize) -> Result<(), QuizError> {
        let QuizPhase::Presenting { question, .. } = self.phase else {
            return Ok(());
        };
        let Some(current) = self.quiz.questions.get(question) else {
            return Ok(());
        };
        if option >= current.options.len() {
            return Err(QuizError::OptionOutOfRange {
                option,
                options: current.options.len(),
            });
        }
        self.phase = QuizPhase::Presenting {
            question,
            selected: Some(option),
        };
        Ok(())
    }

    /// Grades the selected option against the current question.
    ///
    /// Records the result in the answer history and reveals it to the
    /// caller. The attempt stays on the same question until
    /// [`QuizSession::advance`].
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NoSelection`] when nothing is selected,
    /// [`QuizError::AlreadyAnswered`] when the question was already graded,
    /// or [`QuizError::QuizComplete`] after the attempt has ended.
    pub fn submit_answer(&mut self) -> Result<bool, QuizError> {
        let (question_index, selected) = match self.phase {
            QuizPhase::Presenting {
                question,
                selected: Some(selected),
            } => (question, selected),
            QuizPhase::Presenting { selected: None, .. } => {
                return Err(QuizError::NoSelection);
            }
            QuizPhase::Answered { .. } => return Err(QuizError::AlreadyAnswered),
            QuizPhase::Completed { .. } => return Err(QuizError::QuizComplete),
        };
        let Some(question) = self.quiz.questions.get(question_index) else {
            return Err(QuizError::QuizComplete);
        };

        let is_correct = selected == question.correct;
        self.answers.push(AnsweredQuestion {
            question_id: question.id.clone(),
            is_correct,
        });
        self.phase = QuizPhase::Answered {
            question: question_index,
            selected,
        };
        Ok(is_correct)
    }

    /// Moves past an answered question.
    ///
    /// On the last question this fixes the final score and reports it,
    /// exactly once, as [`QuizAdvance::Completed`].
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotAnswered`] when the current question has not
    /// been graded, or [`QuizError::QuizComplete`] after the attempt has
    /// ended.
    pub fn advance(&mut self) -> Result<QuizAdvance, QuizError> {
        match self.phase {
            QuizPhase::Presenting { .. } => Err(QuizError::NotAnswered),
            QuizPhase::Completed { .. } => Err(QuizError::QuizComplete),
            QuizPhase::Answered { question, .. } => {
                let next = question + 1;
                if next < self.quiz.questions.len() {
                    self.phase = QuizPhase::Presenting {
                        question: next,
                        selected: None,
                    };
                    Ok(QuizAdvance::NextQuestion(next))
                } else {
                    let correct = self.answers.iter().filter(|a| a.is_correct).count();
                    let score = engine::percent(correct, self.quiz.questions.len());
                    let passed = score >= self.quiz.passing_score;
                    self.phase = QuizPhase::Completed { score };
                    Ok(QuizAdvance::Completed { score, passed })
                }
            }
        }
    }

    /// Abandons the attempt and starts over at the first question.
    ///
    /// The answer history is cleared; nothing recorded elsewhere is touched.
    pub fn restart(&mut self) {
        self.phase = QuizPhase::Presenting {
            question: 0,
            selected: None,
        };
        self.answers.clear();
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    /// Id of the quiz being attempted
    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz.id
    }

    /// Passing threshold of the quiz being attempted
    #[must_use]
    pub fn passing_score(&self) -> u8 {
        self.quiz.passing_score
    }

    /// Current phase of the attempt
    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    /// The question currently shown, `None` once the attempt is complete
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Presenting { question, .. } | QuizPhase::Answered { question, .. } => {
                self.quiz.questions.get(question)
            }
            QuizPhase::Completed { .. } => None,
        }
    }

    /// The option currently selected, if any
    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        match self.phase {
            QuizPhase::Presenting { selected, .. } => selected,
            QuizPhase::Answered { selected, .. } => Some(selected),
            QuizPhase::Completed { .. } => None,
        }
    }

    /// Graded questions so far, in answer order
    #[must_use]
    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    /// Snapshot of the attempt's position
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.quiz.questions.len();
        let answered = self.answers.len();
        QuizProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            percent: engine::percent(answered, total),
            is_complete: self.is_complete(),
        }
    }

    /// Whether the attempt has ended
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, QuizPhase::Completed { .. })
    }

    /// Final score, once the attempt has ended
    #[must_use]
    pub fn final_score(&self) -> Option<u8> {
        match self.phase {
            QuizPhase::Completed { score } => Some(score),
            _ => None,
        }
    }

    /// Whether the final score met the passing threshold
    #[must_use]
    pub fn passed(&self) -> Option<bool> {
        self.final_score()
            .map(|score| score >= self.quiz.passing_score)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz", &self.quiz.id)
            .field("phase", &self.phase)
            .field("answered", &self.answers.len())
            .finish_non_exhaustive()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn question(id: &str, correct: usize) -> Question {
        Question {
            id: QuestionId::new(id),
            question: "Which one?".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct,
            explanation: String::new(),
        }
    }

    fn three_question_quiz(passing_score: u8) -> Quiz {
        Quiz {
            id: QuizId::new("q1"),
            questions: vec![question("q1-1", 0), question("q1-2", 1), question("q1-3", 2)],
            passing_score,
        }
    }

    fn answer(session: &mut QuizSession, option: usize) -> bool {
        session.select_option(option).unwrap();
        session.submit_answer().unwrap()
    }

    #[test]
    fn test_empty_quiz_is_rejected() {
        let quiz = Quiz {
            id: QuizId::new("q0"),
            questions: Vec::new(),
            passing_score: 70,
        };

        assert_eq!(QuizSession::new(quiz).unwrap_err(), QuizError::NoQuestions);
    }

    #[test]
    fn test_attempt_starts_at_first_question_unselected() {
        let session = QuizSession::new(three_question_quiz(70)).unwrap();

        assert_eq!(
            session.phase(),
            &QuizPhase::Presenting {
                question: 0,
                selected: None
            }
        );
        assert_eq!(session.current_question().unwrap().id, QuestionId::new("q1-1"));
        assert_eq!(session.selected_option(), None);
    }

    #[test]
    fn test_submit_without_selection_is_rejected() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        assert_eq!(session.submit_answer().unwrap_err(), QuizError::NoSelection);
    }

    #[test]
    fn test_selection_can_change_before_submit() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        session.select_option(2).unwrap();
        session.select_option(0).unwrap();

        assert_eq!(session.selected_option(), Some(0));
        assert!(session.submit_answer().unwrap());
    }

    #[test]
    fn test_selection_out_of_range_is_rejected() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        assert_eq!(
            session.select_option(3).unwrap_err(),
            QuizError::OptionOutOfRange {
                option: 3,
                options: 3
            }
        );
    }

    #[test]
    fn test_selection_after_submit_is_ignored() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();
        answer(&mut session, 0);

        session.select_option(2).unwrap();

        assert_eq!(session.selected_option(), Some(0));
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();
        answer(&mut session, 0);

        assert_eq!(
            session.submit_answer().unwrap_err(),
            QuizError::AlreadyAnswered
        );
    }

    #[test]
    fn test_advance_before_submit_is_rejected() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        assert_eq!(session.advance().unwrap_err(), QuizError::NotAnswered);
    }

    #[test]
    fn test_wrong_answer_is_graded_and_recorded() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        let is_correct = answer(&mut session, 1);

        assert!(!is_correct);
        assert_eq!(
            session.answers(),
            [AnsweredQuestion {
                question_id: QuestionId::new("q1-1"),
                is_correct: false
            }]
        );
    }

    #[test]
    fn test_two_of_three_scores_67_and_fails_at_70() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        assert!(!answer(&mut session, 1)); // wrong, correct is 0
        assert_eq!(session.advance().unwrap(), QuizAdvance::NextQuestion(1));
        assert!(answer(&mut session, 1));
        assert_eq!(session.advance().unwrap(), QuizAdvance::NextQuestion(2));
        assert!(answer(&mut session, 2));

        assert_eq!(
            session.advance().unwrap(),
            QuizAdvance::Completed {
                score: 67,
                passed: false
            }
        );
        assert_eq!(session.final_score(), Some(67));
        assert_eq!(session.passed(), Some(false));
    }

    #[test]
    fn test_perfect_run_passes() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();

        for (index, option) in [0usize, 1, 2].into_iter().enumerate() {
            assert!(answer(&mut session, option));
            let advance = session.advance().unwrap();
            if index < 2 {
                assert_eq!(advance, QuizAdvance::NextQuestion(index + 1));
            } else {
                assert_eq!(
                    advance,
                    QuizAdvance::Completed {
                        score: 100,
                        passed: true
                    }
                );
            }
        }
    }

    #[test]
    fn test_completion_is_reported_exactly_once() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();
        answer(&mut session, 0);
        session.advance().unwrap();
        answer(&mut session, 1);
        session.advance().unwrap();
        answer(&mut session, 2);
        session.advance().unwrap();

        assert_eq!(session.advance().unwrap_err(), QuizError::QuizComplete);
        assert_eq!(session.submit_answer().unwrap_err(), QuizError::QuizComplete);
        assert!(session.select_option(0).is_ok());
        assert!(session.is_complete());
    }

    #[test]
    fn test_progress_counts_answers() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();
        answer(&mut session, 0);
        session.advance().unwrap();

        assert_eq!(
            session.progress(),
            QuizProgress {
                total: 3,
                answered: 1,
                remaining: 2,
                percent: 33,
                is_complete: false
            }
        );
    }

    #[test]
    fn test_restart_clears_history_and_allows_a_retake() {
        let mut session = QuizSession::new(three_question_quiz(70)).unwrap();
        answer(&mut session, 1);
        session.advance().unwrap();

        session.restart();

        assert_eq!(
            session.phase(),
            &QuizPhase::Presenting {
                question: 0,
                selected: None
            }
        );
        assert!(session.answers().is_empty());
        assert!(answer(&mut session, 0));
    }

    #[test]
    fn test_single_question_quiz_completes_in_one_round() {
        let quiz = Quiz {
            id: QuizId::new("q2"),
            questions: vec![question("q2-1", 1)],
            passing_score: 100,
        };
        let mut session = QuizSession::new(quiz).unwrap();

        assert!(answer(&mut session, 1));
        assert_eq!(
            session.advance().unwrap(),
            QuizAdvance::Completed {
                score: 100,
                passed: true
            }
        );
    }
}
