use thiserror::Error;

use crate::model::{QuestionError, StatsError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}
