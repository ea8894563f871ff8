use std::sync::Arc;

use prep_core::Clock;
use storage::repository::Storage;

use crate::catalog::QuestionCatalog;
use crate::error::AppServicesError;
use crate::quiz::QuizService;
use crate::stats_service::StatsService;

/// Assembles app-facing services over a question catalog and a storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<QuestionCatalog>,
    quiz: Arc<QuizService>,
    stats: Arc<StatsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        catalog: QuestionCatalog,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(clock, catalog, storage))
    }

    /// Build services over in-memory storage, for tests and prototyping.
    #[must_use]
    pub fn in_memory(clock: Clock, catalog: QuestionCatalog) -> Self {
        Self::assemble(clock, catalog, Storage::in_memory())
    }

    fn assemble(clock: Clock, catalog: QuestionCatalog, storage: Storage) -> Self {
        let catalog = Arc::new(catalog);
        let stats = Arc::new(StatsService::new(clock, Arc::clone(&storage.stats)));
        let quiz = Arc::new(QuizService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&stats),
        ));

        Self {
            catalog,
            quiz,
            stats,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuestionCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }
}
