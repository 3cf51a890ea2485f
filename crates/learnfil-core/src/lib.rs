//! learnfil-core: Curriculum model, progress tracking, and code validation.
//!
//! This crate defines the data model, the key-value store adapter, and the
//! services a LearnFIL front end drives: the curriculum repository, the
//! progress tracker, bookmarks, and the validator that grades learner code.

pub mod bookmarks;
pub mod curriculum;
pub mod error;
pub mod model;
pub mod progress;
pub mod repository;
pub mod session;
pub mod store;
pub mod traits;
pub mod validator;

pub use error::{ExecError, StorageError};
pub use session::{LearningEvents, LearningSession, NoopEvents, RunOutcome};
