//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::model::StatsError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsServiceError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("answer option {index} is out of range")]
    InvalidOption { index: usize },
    #[error("quiz already completed")]
    AlreadyCompleted,
    #[error("no questions in session")]
    Empty,
    #[error(transparent)]
    Stats(#[from] StatsServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
