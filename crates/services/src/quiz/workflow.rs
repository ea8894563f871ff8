use std::sync::Arc;

use prep_core::model::Category;
use prep_core::Clock;

use super::results::ResultSnapshot;
use super::session::{QuizSession, StepOutcome};
use crate::catalog::QuestionCatalog;
use crate::error::QuizError;
use crate::stats_service::StatsService;

/// Orchestrates session start, navigation, and persisted completion.
///
/// The session itself is a plain value the caller mutates one intent at a
/// time; this service adds the catalog draw on start/restart and makes sure
/// the aggregate statistics are recorded exactly once per sitting.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    catalog: Arc<QuestionCatalog>,
    stats: Arc<StatsService>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<QuestionCatalog>, stats: Arc<StatsService>) -> Self {
        Self {
            clock,
            catalog,
            stats,
        }
    }

    /// Start a new session scoped to `filter` (`None` = all categories).
    ///
    /// A filter matching zero questions yields a valid empty session.
    #[must_use]
    pub fn start(&self, filter: Option<Category>) -> QuizSession {
        QuizSession::new(self.catalog.by_category(filter), filter, self.clock.now())
    }

    /// Step the session forward; records statistics when the step finishes it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` for a finished session and
    /// `QuizError::Stats` when recording fails.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<StepOutcome, QuizError> {
        let outcome = session.advance(self.clock.now())?;
        if let StepOutcome::Finished(snapshot) = &outcome {
            self.record_once(session, snapshot).await?;
        }
        Ok(outcome)
    }

    /// Finish the session from any position.
    ///
    /// Calling this on an already-completed session is a no-op that returns
    /// the existing snapshot; statistics are never double-counted.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Stats` when recording fails.
    pub async fn finish(&self, session: &mut QuizSession) -> Result<ResultSnapshot, QuizError> {
        let snapshot = match session.snapshot() {
            Some(existing) => existing,
            None => session.finish(self.clock.now())?,
        };
        self.record_once(session, &snapshot).await?;
        Ok(snapshot)
    }

    /// Discard the session's state and redraw a fresh sample, same filter.
    pub fn restart(&self, session: &mut QuizSession) {
        let pool = self.catalog.by_category(session.category_filter());
        session.reset_with(pool, self.clock.now());
    }

    async fn record_once(
        &self,
        session: &mut QuizSession,
        snapshot: &ResultSnapshot,
    ) -> Result<(), QuizError> {
        if session.stats_recorded() {
            return Ok(());
        }
        self.stats
            .record_completion(snapshot.percentage, session.category_filter())
            .await?;
        session.mark_stats_recorded();
        Ok(())
    }
}
