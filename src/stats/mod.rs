pub mod aggregator;
pub mod ranking;
pub mod service;

mod errors;
pub mod models;
pub mod repository;

pub use aggregator::{apply, validate};
pub use errors::StatsError;
pub use models::*;
pub use ranking::{recompute, RankingCalculator, TieBreak};
pub use repository::{StatsRepository, StoreStatsRepository};
pub use service::StatsService;
