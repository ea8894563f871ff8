mod ids;
mod question;
mod stats;

pub use ids::{ParseIdError, QuestionId};
pub use question::{
    Category, DifficultyTier, Part, Question, QuestionDraft, QuestionError, OPTION_COUNT,
};
pub use stats::{QuizStats, StatsError};
