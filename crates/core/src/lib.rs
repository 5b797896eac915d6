#![forbid(unsafe_code)]

//! Domain core of the course progress engine.
//!
//! Holds the content catalog model, the learner's progress state with its
//! invariant-preserving mutations, the badge rules, the pure progress and
//! unlock derivations, and the quiz attempt state machine. No persistence
//! and no async live here; the storage and services crates layer those on.

pub mod badges;
pub mod engine;
pub mod model;
pub mod quiz;

pub use badges::StandardBadge;
pub use model::{CourseCatalog, ProgressState};
pub use quiz::{AnsweredQuestion, QuizAdvance, QuizError, QuizPhase, QuizProgress, QuizSession};
