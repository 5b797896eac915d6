#![forbid(unsafe_code)]

//! Persistence for the course progress core.
//!
//! The learner's progress serializes to a single JSON payload stored under
//! [`repository::PROGRESS_KEY`]. [`repository`] holds the contract, the
//! persisted record shape and an in-memory backend; [`sqlite`] holds the
//! durable one.

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, PROGRESS_KEY, ProgressRecord, ProgressRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
