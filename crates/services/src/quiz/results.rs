use chrono::{DateTime, Utc};
use serde::Serialize;

use prep_core::model::{Category, DifficultyTier, Question, QuestionId, OPTION_COUNT};
use prep_core::score;

/// `(correct, total)` over the sample for one category.
///
/// Categories absent from the sample are still listed with `(0, 0)`; the
/// presentation layer decides whether to hide them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub correct: usize,
    pub total: usize,
}

/// `(correct, total)` over the sample for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyBreakdown {
    pub tier: DifficultyTier,
    pub correct: usize,
    pub total: usize,
}

/// One question as shown on the review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub chosen: Option<usize>,
    pub correct_option: usize,
    pub explanation: String,
    /// `None` when the slot was left unanswered.
    pub is_correct: Option<bool>,
}

/// Read-only results of a completed session.
///
/// Presentation-agnostic: no pre-formatted strings, no localization
/// assumptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSnapshot {
    pub score: usize,
    pub total: usize,
    pub percentage: u8,
    pub estimated_score: u16,
    pub target_reached: bool,
    pub category_filter: Option<Category>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_difficulty: Vec<DifficultyBreakdown>,
    pub review: Vec<QuestionReview>,
}

impl ResultSnapshot {
    pub(crate) fn from_answer_sheet(
        questions: &[Question],
        answers: &[Option<usize>],
        session_score: usize,
        category_filter: Option<Category>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let percentage = score::score_percentage(session_score, questions.len());

        let by_category = Category::ALL
            .into_iter()
            .map(|category| {
                let (correct, total) =
                    tally(questions, answers, |q| q.category() == category);
                CategoryBreakdown {
                    category,
                    correct,
                    total,
                }
            })
            .collect();

        let by_difficulty = DifficultyTier::ALL
            .into_iter()
            .map(|tier| {
                let (correct, total) = tally(questions, answers, |q| q.difficulty() == tier);
                DifficultyBreakdown {
                    tier,
                    correct,
                    total,
                }
            })
            .collect();

        let review = questions
            .iter()
            .zip(answers)
            .map(|(question, &chosen)| QuestionReview {
                question_id: question.id(),
                prompt: question.prompt().to_owned(),
                options: question.options().clone(),
                chosen,
                correct_option: question.correct_option(),
                explanation: question.explanation().to_owned(),
                is_correct: chosen.map(|c| question.is_correct(c)),
            })
            .collect();

        Self {
            score: session_score,
            total: questions.len(),
            percentage,
            estimated_score: score::estimated_scaled_score(percentage),
            target_reached: score::is_target_reached(percentage),
            category_filter,
            started_at,
            completed_at,
            by_category,
            by_difficulty,
            review,
        }
    }
}

fn tally(
    questions: &[Question],
    answers: &[Option<usize>],
    matches: impl Fn(&Question) -> bool,
) -> (usize, usize) {
    let mut correct = 0;
    let mut total = 0;
    for (question, answer) in questions.iter().zip(answers) {
        if !matches(question) {
            continue;
        }
        total += 1;
        if answer.is_some_and(|chosen| question.is_correct(chosen)) {
            correct += 1;
        }
    }
    (correct, total)
}
