#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{CategoryScore, InMemoryRepository, StatsRepository, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
