use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    aggregator,
    ranking::RankingCalculator,
    repository::StatsRepository,
    LeaderboardEntry, MatchOutcome, PlayerStatistics, StatsError,
};
use crate::catalog::GameCatalog;

/// Owns the `apply` then `recompute` then persist cycle, plus the read
/// side used by leaderboards and profiles.
pub struct StatsService {
    repository: Arc<dyn StatsRepository>,
    catalog: Arc<GameCatalog>,
    calculator: RankingCalculator,
}

impl StatsService {
    pub fn new(
        repository: Arc<dyn StatsRepository>,
        catalog: Arc<GameCatalog>,
        calculator: RankingCalculator,
    ) -> Self {
        Self {
            repository,
            catalog,
            calculator,
        }
    }

    /// Counts one completed match and re-ranks everybody.
    ///
    /// Nothing is persisted when the outcome is invalid.
    #[instrument(skip(self, outcome), fields(game_id = %outcome.game_id, winner = %outcome.winner_id))]
    pub async fn record_outcome(
        &self,
        outcome: &MatchOutcome,
    ) -> Result<Vec<PlayerStatistics>, StatsError> {
        let mut stats = self.repository.load_all().await?;

        if let Err(err) = aggregator::apply(outcome, &mut stats) {
            warn!(error = %err, "Rejected match outcome");
            return Err(err);
        }

        let game_ids = self.catalog.game_ids().await?;
        self.calculator.recompute(&mut stats, &game_ids);
        self.repository.save_all(&stats).await?;

        info!(
            participants = outcome.participants.len(),
            player_count = stats.len(),
            "Match outcome recorded"
        );
        Ok(stats)
    }

    pub async fn all_stats(&self) -> Result<Vec<PlayerStatistics>, StatsError> {
        self.repository.load_all().await
    }

    pub async fn user_stats(&self, user_id: &str) -> Result<Option<PlayerStatistics>, StatsError> {
        Ok(self
            .repository
            .load_all()
            .await?
            .into_iter()
            .find(|s| s.user_id == user_id))
    }

    /// Global rank, or the rank within `game_id`; 0 when unranked
    pub async fn player_ranking(
        &self,
        user_id: &str,
        game_id: Option<&str>,
    ) -> Result<u32, StatsError> {
        let Some(stats) = self.user_stats(user_id).await? else {
            return Ok(0);
        };

        Ok(match game_id {
            Some(game_id) => stats.game(game_id).map(|g| g.rank).unwrap_or(0),
            None => stats.rank,
        })
    }

    /// Rows ordered by wins, overall or for a single game, with ties broken
    /// the same way as the stored ranks.
    ///
    /// Per-game boards only list players who have played that game.
    #[instrument(skip(self))]
    pub async fn leaderboard(
        &self,
        game_id: Option<&str>,
    ) -> Result<Vec<LeaderboardEntry>, StatsError> {
        let stats = self.repository.load_all().await?;

        let mut rows: Vec<(String, u32, u32, u32)> = match game_id {
            None => stats
                .iter()
                .map(|s| (s.user_id.clone(), s.wins, s.losses, s.win_rate_percent()))
                .collect(),
            Some(game_id) => stats
                .iter()
                .filter_map(|s| {
                    s.game(game_id)
                        .map(|g| (s.user_id.clone(), g.wins, g.losses, g.win_rate_percent()))
                })
                .collect(),
        };
        // Rows are in stored order, so this matches the ranks from `recompute`
        let tie_break = self.calculator.tie_break();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| tie_break.compare(&a.0, &b.0)));

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, (user_id, wins, losses, win_rate_percent))| LeaderboardEntry {
                position: index as u32 + 1,
                user_id,
                wins,
                losses,
                win_rate_percent,
            })
            .collect())
    }
}
