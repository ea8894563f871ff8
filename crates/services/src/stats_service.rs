use chrono::{DateTime, Utc};
use std::sync::Arc;

use prep_core::model::{Category, QuizStats};
use prep_core::Clock;
use storage::repository::{CategoryScore, InMemoryRepository, StatsRepository};

use crate::error::StatsServiceError;

/// Facade over the persisted statistics store.
///
/// Owns the time source and repository access; follows an explicit
/// load → fold → write-back lifecycle rather than ambient global state.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, stats: Arc<dyn StatsRepository>) -> Self {
        Self { clock, stats }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(InMemoryRepository::new()))
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fold one completed session into the aggregates and persist them.
    ///
    /// When the session ran under a category filter, the percentage is also
    /// appended to that category's history.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError` on repository failures or an out-of-range
    /// percentage.
    pub async fn record_completion(
        &self,
        percentage: u8,
        category: Option<Category>,
    ) -> Result<QuizStats, StatsServiceError> {
        let mut stats = self.stats.load_stats().await?.unwrap_or_default();
        stats.record(percentage)?;
        self.stats.save_stats(&stats).await?;

        if let Some(category) = category {
            self.stats
                .append_category_score(category, percentage, self.clock.now())
                .await?;
        }

        Ok(stats)
    }

    /// Current aggregates; defaults when nothing has been recorded yet.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` on repository failures.
    pub async fn overview(&self) -> Result<QuizStats, StatsServiceError> {
        Ok(self.stats.load_stats().await?.unwrap_or_default())
    }

    /// Most recent scores for a category, newest first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` on repository failures.
    pub async fn category_history(
        &self,
        category: Category,
        limit: u32,
    ) -> Result<Vec<CategoryScore>, StatsServiceError> {
        Ok(self.stats.category_history(category, limit).await?)
    }
}
