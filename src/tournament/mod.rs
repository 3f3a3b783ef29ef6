pub mod models;
mod service;

pub use models::{Match, MatchStatus, Tournament, TournamentFilter, TournamentStatus};
pub use service::TournamentService;
