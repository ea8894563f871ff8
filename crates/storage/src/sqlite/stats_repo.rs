use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use prep_core::model::{Category, QuizStats};

use super::SqliteRepository;
use crate::repository::{CategoryScore, StatsRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn pct_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| StorageError::Serialization(format!("invalid {field}: {v}")))
}

#[async_trait]
impl StatsRepository for SqliteRepository {
    async fn load_stats(&self) -> Result<Option<QuizStats>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT total_sessions, average_percentage, best_percentage
            FROM quiz_stats
            WHERE id = 1
            ",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let total: i64 = row.try_get("total_sessions").map_err(ser)?;
        let total = u32::try_from(total)
            .map_err(|_| StorageError::Serialization(format!("invalid total_sessions: {total}")))?;
        let average: f64 = row.try_get("average_percentage").map_err(ser)?;
        let best = pct_from_i64(
            "best_percentage",
            row.try_get::<i64, _>("best_percentage").map_err(ser)?,
        )?;

        QuizStats::from_persisted(total, average, best)
            .map(Some)
            .map_err(ser)
    }

    async fn save_stats(&self, stats: &QuizStats) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quiz_stats (id, total_sessions, average_percentage, best_percentage)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                total_sessions = excluded.total_sessions,
                average_percentage = excluded.average_percentage,
                best_percentage = excluded.best_percentage
            ",
        )
        .bind(1_i64)
        .bind(i64::from(stats.total_sessions()))
        .bind(stats.average_percentage())
        .bind(i64::from(stats.best_percentage()))
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn append_category_score(
        &self,
        category: Category,
        percentage: u8,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO category_scores (category, percentage, recorded_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(category.as_str())
        .bind(i64::from(percentage))
        .bind(recorded_at)
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn category_history(
        &self,
        category: Category,
        limit: u32,
    ) -> Result<Vec<CategoryScore>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT percentage, recorded_at
            FROM category_scores
            WHERE category = ?1
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?2
            ",
        )
        .bind(category.as_str())
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let percentage = pct_from_i64(
                "percentage",
                row.try_get::<i64, _>("percentage").map_err(ser)?,
            )?;
            let recorded_at = row.try_get("recorded_at").map_err(ser)?;
            out.push(CategoryScore {
                percentage,
                recorded_at,
            });
        }

        Ok(out)
    }
}
