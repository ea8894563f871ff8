use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prep_core::model::{Category, QuizStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// One entry in a category's append-only score history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub percentage: u8,
    pub recorded_at: DateTime<Utc>,
}

/// Repository contract for the aggregate statistics store.
///
/// Aggregates are loaded once, folded in memory, and written back whole;
/// category history is append-only with a read-side cap.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Load the persisted aggregates, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stats cannot be read or fail validation.
    async fn load_stats(&self) -> Result<Option<QuizStats>, StorageError>;

    /// Persist the aggregates, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stats cannot be stored.
    async fn save_stats(&self, stats: &QuizStats) -> Result<(), StorageError>;

    /// Append one session percentage to a category's history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_category_score(
        &self,
        category: Category,
        percentage: u8,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Most recent history entries for a category, newest first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read.
    async fn category_history(
        &self,
        category: Category,
        limit: u32,
    ) -> Result<Vec<CategoryScore>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    stats: Arc<Mutex<Option<QuizStats>>>,
    history: Arc<Mutex<HashMap<Category, Vec<CategoryScore>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository for InMemoryRepository {
    async fn load_stats(&self) -> Result<Option<QuizStats>, StorageError> {
        let guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_stats(&self, stats: &QuizStats) -> Result<(), StorageError> {
        let mut guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*stats);
        Ok(())
    }

    async fn append_category_score(
        &self,
        category: Category,
        percentage: u8,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.entry(category).or_default().push(CategoryScore {
            percentage,
            recorded_at,
        });
        Ok(())
    }

    async fn category_history(
        &self,
        category: Category,
        limit: u32,
    ) -> Result<Vec<CategoryScore>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut entries = guard.get(&category).cloned().unwrap_or_default();
        entries.reverse();
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(entries)
    }
}

/// Aggregates the stats repository behind a trait object for backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            stats: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::time::fixed_now;

    #[tokio::test]
    async fn stats_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_stats().await.unwrap().is_none());

        let mut stats = QuizStats::default();
        stats.record(75).unwrap();
        repo.save_stats(&stats).await.unwrap();

        let loaded = repo.load_stats().await.unwrap().unwrap();
        assert_eq!(loaded.total_sessions(), 1);
        assert_eq!(loaded.best_percentage(), 75);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_capped() {
        let repo = InMemoryRepository::new();
        let now = fixed_now();
        for (i, pct) in [40_u8, 60, 80].into_iter().enumerate() {
            repo.append_category_score(
                Category::Grammar,
                pct,
                now + chrono::Duration::days(i as i64),
            )
            .await
            .unwrap();
        }

        let history = repo.category_history(Category::Grammar, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].percentage, 80);
        assert_eq!(history[1].percentage, 60);

        let other = repo.category_history(Category::Reading, 10).await.unwrap();
        assert!(other.is_empty());
    }
}
