mod progress;
mod results;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use results::{CategoryBreakdown, DifficultyBreakdown, QuestionReview, ResultSnapshot};
pub use session::{QuizSession, StepOutcome, QUESTIONS_PER_QUIZ};
pub use workflow::QuizService;
