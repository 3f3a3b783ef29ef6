use std::cmp::Ordering;

use strum_macros::{Display, EnumString};

use super::PlayerStatistics;

/// How players with equal wins are ordered against each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum TieBreak {
    /// Equal players keep the order they have in the collection.
    #[default]
    InputOrder,
    /// Equal players are ordered by user id, ascending.
    UserId,
}

impl TieBreak {
    /// Orders two players whose win counts are equal.
    pub fn compare(self, a_user_id: &str, b_user_id: &str) -> Ordering {
        match self {
            TieBreak::InputOrder => Ordering::Equal,
            TieBreak::UserId => a_user_id.cmp(b_user_id),
        }
    }
}

/// Recomputes every global and per-game rank from the current win counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingCalculator {
    tie_break: TieBreak,
}

impl RankingCalculator {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Overwrites all rank fields in `stats`.
    ///
    /// Global ranks are dense `1..=n` over all entries by wins. For each id in
    /// `game_ids`, the entries holding a bucket for that game are ranked
    /// `1..=m` by that game's wins. Buckets of games outside `game_ids` are
    /// left at 0.
    pub fn recompute(&self, stats: &mut [PlayerStatistics], game_ids: &[String]) {
        let mut order: Vec<usize> = (0..stats.len()).collect();
        order.sort_by(|&a, &b| {
            stats[b]
                .wins
                .cmp(&stats[a].wins)
                .then_with(|| self.secondary(&stats[a], &stats[b]))
        });
        for (position, &index) in order.iter().enumerate() {
            stats[index].rank = position as u32 + 1;
        }

        for entry in stats.iter_mut() {
            for bucket in entry.game_stats.values_mut() {
                bucket.rank = 0;
            }
        }

        for game_id in game_ids {
            let mut players: Vec<(usize, u32)> = stats
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| entry.game(game_id).map(|g| (index, g.wins)))
                .collect();
            players.sort_by(|&(a, a_wins), &(b, b_wins)| {
                b_wins
                    .cmp(&a_wins)
                    .then_with(|| self.secondary(&stats[a], &stats[b]))
            });

            for (position, (index, _)) in players.into_iter().enumerate() {
                if let Some(bucket) = stats[index].game_stats.get_mut(game_id) {
                    bucket.rank = position as u32 + 1;
                }
            }
        }
    }

    fn secondary(&self, a: &PlayerStatistics, b: &PlayerStatistics) -> Ordering {
        self.tie_break.compare(&a.user_id, &b.user_id)
    }
}

/// Ranks with the default tie-break.
pub fn recompute(stats: &mut [PlayerStatistics], game_ids: &[String]) {
    RankingCalculator::default().recompute(stats, game_ids);
}
