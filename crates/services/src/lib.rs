#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod quiz;
pub mod stats_service;

pub use prep_core::Clock;

pub use app_services::AppServices;
pub use catalog::QuestionCatalog;
pub use error::{AppServicesError, QuizError, StatsServiceError};
pub use quiz::{
    QuizProgress, QuizService, QuizSession, ResultSnapshot, StepOutcome, QUESTIONS_PER_QUIZ,
};
pub use stats_service::StatsService;
