// Library crate for the tournament tracker
// This file exposes the public API for the CLI and integration tests

pub mod catalog;
pub mod chat;
pub mod cli;
pub mod config;
pub mod notification;
pub mod shared;
pub mod stats;
pub mod store;
pub mod tournament;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use shared::{AppError, AppState};
pub use stats::{MatchOutcome, PlayerStatistics, RankingCalculator, StatsError, TieBreak};
pub use store::{InMemoryRecordStore, JsonFileRecordStore, RecordStore};
