use chrono::{DateTime, Utc};
use std::fmt;

use prep_core::model::{Category, Question, OPTION_COUNT};
use prep_core::score;

use super::progress::QuizProgress;
use super::results::ResultSnapshot;
use crate::error::QuizError;

/// Target sample size for one sitting.
pub const QUESTIONS_PER_QUIZ: usize = 20;

/// Outcome of a forward step.
///
/// Stepping forward at the last question finishes the session instead of
/// being a no-op; callers learn which happened from this value.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Advanced,
    Finished(ResultSnapshot),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session for a single sitting.
///
/// Holds a fixed sample of up to [`QUESTIONS_PER_QUIZ`] questions drawn at
/// creation, a parallel answer sheet, and a cursor. A zero-question sample is
/// a valid degenerate session; every derived value defaults to 0 for it.
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current: usize,
    score: usize,
    category_filter: Option<Category>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    stats_recorded: bool,
}

impl QuizSession {
    /// Create a session from a pre-shuffled pool, keeping the first
    /// `min(QUESTIONS_PER_QUIZ, pool.len())` questions.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    #[must_use]
    pub fn new(
        mut pool: Vec<Question>,
        category_filter: Option<Category>,
        started_at: DateTime<Utc>,
    ) -> Self {
        pool.truncate(QUESTIONS_PER_QUIZ);
        let answers = vec![None; pool.len()];

        Self {
            questions: pool,
            answers,
            current: 0,
            score: 0,
            category_filter,
            started_at,
            completed_at: None,
            stats_recorded: false,
        }
    }

    /// Discard all state and start over with a fresh sample, same filter.
    pub fn reset_with(&mut self, pool: Vec<Question>, started_at: DateTime<Utc>) {
        *self = Self::new(pool, self.category_filter, started_at);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn category_filter(&self) -> Option<Category> {
        self.category_filter
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Index of the question the cursor is on.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// The learner's choice for the current slot, if any.
    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.answers.get(self.current).copied().flatten()
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Number of slots with a recorded choice.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Tallied score. Stays 0 until the session is finished.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let fraction = if self.questions.is_empty() {
            0.0
        } else {
            (self.current + 1) as f64 / self.questions.len() as f64
        };
        QuizProgress {
            total: self.questions.len(),
            answered: self.answered_count(),
            current: self.current,
            fraction,
            is_complete: self.is_complete(),
        }
    }

    /// Record a choice for the current question, overwriting any previous one.
    ///
    /// The cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` once the session is finished,
    /// `QuizError::Empty` when the session has no questions, and
    /// `QuizError::InvalidOption` for an index outside the option range.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        if self.is_complete() {
            return Err(QuizError::AlreadyCompleted);
        }
        if option >= OPTION_COUNT {
            return Err(QuizError::InvalidOption { index: option });
        }
        let Some(slot) = self.answers.get_mut(self.current) else {
            return Err(QuizError::Empty);
        };
        *slot = Some(option);
        Ok(())
    }

    /// Step forward. At the last question (or in an empty session) this
    /// finishes the sitting instead.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` once the session is finished.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<StepOutcome, QuizError> {
        if self.is_complete() {
            return Err(QuizError::AlreadyCompleted);
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            return Ok(StepOutcome::Advanced);
        }
        self.finish(now).map(StepOutcome::Finished)
    }

    /// Step back one question; no-op at the first.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` once the session is finished.
    pub fn back(&mut self) -> Result<(), QuizError> {
        if self.is_complete() {
            return Err(QuizError::AlreadyCompleted);
        }
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Finish the sitting from any cursor position. Unanswered slots count
    /// as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` on a second call; the answer
    /// sheet is frozen after the first.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<ResultSnapshot, QuizError> {
        if self.is_complete() {
            return Err(QuizError::AlreadyCompleted);
        }

        self.score = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.is_some_and(|chosen| q.is_correct(chosen)))
            .count();
        self.completed_at = Some(now);

        Ok(self.build_snapshot(now))
    }

    /// Results of a finished session; `None` while in progress.
    #[must_use]
    pub fn snapshot(&self) -> Option<ResultSnapshot> {
        self.completed_at.map(|at| self.build_snapshot(at))
    }

    fn build_snapshot(&self, completed_at: DateTime<Utc>) -> ResultSnapshot {
        ResultSnapshot::from_answer_sheet(
            &self.questions,
            &self.answers,
            self.score,
            self.category_filter,
            self.started_at,
            completed_at,
        )
    }

    pub(crate) fn stats_recorded(&self) -> bool {
        self.stats_recorded
    }

    pub(crate) fn mark_stats_recorded(&mut self) {
        self.stats_recorded = true;
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        score::score_percentage(self.score, self.questions.len())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("category_filter", &self.category_filter)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("stats_recorded", &self.stats_recorded)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{DifficultyTier, Part, QuestionDraft, QuestionId};
    use prep_core::time::fixed_now;

    fn build_question(id: u64, correct: usize) -> Question {
        QuestionDraft {
            prompt: format!("Prompt {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: correct,
            category: Category::Grammar,
            explanation: String::new(),
            difficulty: DifficultyTier::Intermediate,
            part: Part::Part5,
        }
        .validate(QuestionId::new(id))
        .unwrap()
    }

    fn session_with_corrects(corrects: &[usize]) -> QuizSession {
        let pool = corrects
            .iter()
            .enumerate()
            .map(|(i, &c)| build_question(i as u64, c))
            .collect();
        QuizSession::new(pool, None, fixed_now())
    }

    #[test]
    fn sample_is_truncated_to_target_size() {
        let pool: Vec<_> = (0..30).map(|i| build_question(i, 0)).collect();
        let session = QuizSession::new(pool, None, fixed_now());
        assert_eq!(session.len(), QUESTIONS_PER_QUIZ);
        assert_eq!(session.answers().len(), QUESTIONS_PER_QUIZ);
    }

    #[test]
    fn smaller_pool_keeps_everything() {
        let session = session_with_corrects(&[0, 1, 2]);
        assert_eq!(session.len(), 3);
        assert_eq!(session.answers().len(), 3);
    }

    #[test]
    fn answers_stay_parallel_through_operations() {
        let mut session = session_with_corrects(&[0, 1, 2]);
        session.select_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();
        session.back().unwrap();
        session.select_answer(3).unwrap();
        assert_eq!(session.answers().len(), session.len());
    }

    #[test]
    fn select_answer_overwrites_previous_choice() {
        let mut session = session_with_corrects(&[1]);
        session.select_answer(0).unwrap();
        session.select_answer(1).unwrap();
        assert_eq!(session.selected_answer(), Some(1));

        let snap = session.finish(fixed_now()).unwrap();
        assert_eq!(snap.score, 1);
    }

    #[test]
    fn select_answer_rejects_out_of_range_option() {
        let mut session = session_with_corrects(&[0]);
        let err = session.select_answer(4).unwrap_err();
        assert!(matches!(err, QuizError::InvalidOption { index: 4 }));
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn back_at_first_question_is_a_noop() {
        let mut session = session_with_corrects(&[0, 1]);
        session.back().unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn advance_at_last_question_finishes() {
        let mut session = session_with_corrects(&[1, 0]);
        session.select_answer(1).unwrap();
        assert!(matches!(
            session.advance(fixed_now()).unwrap(),
            StepOutcome::Advanced
        ));
        session.select_answer(0).unwrap();

        let outcome = session.advance(fixed_now()).unwrap();
        let StepOutcome::Finished(snap) = outcome else {
            panic!("expected finish at last question");
        };
        assert!(session.is_complete());
        assert_eq!(snap.score, 2);
    }

    #[test]
    fn advance_at_last_matches_direct_finish() {
        let mut by_advance = session_with_corrects(&[1, 0, 2]);
        let mut by_finish = session_with_corrects(&[1, 0, 2]);
        for session in [&mut by_advance, &mut by_finish] {
            session.select_answer(1).unwrap();
            session.advance(fixed_now()).unwrap();
            session.select_answer(3).unwrap();
            session.advance(fixed_now()).unwrap();
            session.select_answer(2).unwrap();
        }

        let StepOutcome::Finished(snap_a) = by_advance.advance(fixed_now()).unwrap() else {
            panic!("expected finish");
        };
        let snap_b = by_finish.finish(fixed_now()).unwrap();

        assert_eq!(snap_a.score, snap_b.score);
        assert_eq!(snap_a.percentage, snap_b.percentage);
        assert!(by_advance.is_complete() && by_finish.is_complete());
    }

    #[test]
    fn spec_scoring_example() {
        // corrects [1,0,2], answers [1,3,2] -> score 2, 67%.
        let mut session = session_with_corrects(&[1, 0, 2]);
        session.select_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();
        session.select_answer(3).unwrap();
        session.advance(fixed_now()).unwrap();
        session.select_answer(2).unwrap();

        let snap = session.finish(fixed_now()).unwrap();
        assert_eq!(snap.score, 2);
        assert_eq!(snap.percentage, 67);
    }

    #[test]
    fn early_finish_counts_unanswered_as_incorrect() {
        let mut session = session_with_corrects(&[0, 1, 2, 3]);
        session.select_answer(0).unwrap();

        let snap = session.finish(fixed_now()).unwrap();
        assert_eq!(snap.score, 1);
        assert_eq!(snap.total, 4);
        assert_eq!(snap.percentage, 25);
    }

    #[test]
    fn mutations_are_rejected_after_completion() {
        let mut session = session_with_corrects(&[0]);
        session.finish(fixed_now()).unwrap();

        assert!(matches!(
            session.select_answer(0),
            Err(QuizError::AlreadyCompleted)
        ));
        assert!(matches!(
            session.advance(fixed_now()),
            Err(QuizError::AlreadyCompleted)
        ));
        assert!(matches!(session.back(), Err(QuizError::AlreadyCompleted)));
        assert!(matches!(
            session.finish(fixed_now()),
            Err(QuizError::AlreadyCompleted)
        ));
    }

    #[test]
    fn empty_session_is_valid_and_finishes_with_zero() {
        let mut session = QuizSession::new(Vec::new(), Some(Category::Reading), fixed_now());
        assert!(session.is_empty());
        assert_eq!(session.progress().fraction, 0.0);
        assert!(matches!(session.select_answer(0), Err(QuizError::Empty)));

        let StepOutcome::Finished(snap) = session.advance(fixed_now()).unwrap() else {
            panic!("advance on empty session should finish");
        };
        assert_eq!(snap.score, 0);
        assert_eq!(snap.percentage, 0);
        assert_eq!(snap.estimated_score, 10);
    }

    #[test]
    fn progress_tracks_cursor() {
        let mut session = session_with_corrects(&[0, 1, 2, 3]);
        assert!((session.progress().fraction - 0.25).abs() < f64::EPSILON);
        session.advance(fixed_now()).unwrap();
        let progress = session.progress();
        assert_eq!(progress.current, 1);
        assert!((progress.fraction - 0.5).abs() < f64::EPSILON);
        assert!(!progress.is_complete);
    }

    #[test]
    fn reset_clears_state_and_keeps_filter() {
        let pool: Vec<_> = (0..3).map(|i| build_question(i, 0)).collect();
        let mut session = QuizSession::new(pool.clone(), Some(Category::Grammar), fixed_now());
        session.select_answer(0).unwrap();
        session.advance(fixed_now()).unwrap();
        session.finish(fixed_now()).unwrap();

        session.reset_with(pool, fixed_now());
        assert!(!session.is_complete());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.category_filter(), Some(Category::Grammar));
    }

    #[test]
    fn snapshot_is_none_until_completion() {
        let mut session = session_with_corrects(&[0]);
        assert!(session.snapshot().is_none());
        session.finish(fixed_now()).unwrap();
        let snap = session.snapshot().expect("completed session has snapshot");
        assert_eq!(snap.total, 1);
    }
}
