use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate win/loss record of one user, overall and per game.
///
/// `rank == 0` means the entry has not been ranked yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    pub user_id: String,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
    pub rank: u32,
    #[serde(default)]
    pub game_stats: BTreeMap<String, GameStatistics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub wins: u32,
    pub losses: u32,
    pub rank: u32,
}

impl PlayerStatistics {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Counts one finished match for this player in `game_id`.
    pub(crate) fn record(&mut self, game_id: &str, won: bool) {
        let bucket = self.game_stats.entry(game_id.to_string()).or_default();
        if won {
            self.wins += 1;
            bucket.wins += 1;
        } else {
            self.losses += 1;
            bucket.losses += 1;
        }
        self.games_played += 1;
    }

    pub fn game(&self, game_id: &str) -> Option<&GameStatistics> {
        self.game_stats.get(game_id)
    }

    pub fn win_rate_percent(&self) -> u32 {
        win_rate_percent(self.wins, self.losses)
    }
}

impl GameStatistics {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate_percent(&self) -> u32 {
        win_rate_percent(self.wins, self.losses)
    }
}

fn win_rate_percent(wins: u32, losses: u32) -> u32 {
    let total = wins + losses;
    if total == 0 {
        return 0;
    }
    (f64::from(wins) * 100.0 / f64::from(total)).round() as u32
}

/// Result of one completed match, as handed over by match management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub participants: Vec<String>,
    pub winner_id: String,
    pub game_id: String,
}

impl MatchOutcome {
    pub fn new(
        participants: Vec<String>,
        winner_id: impl Into<String>,
        game_id: impl Into<String>,
    ) -> Self {
        Self {
            participants,
            winner_id: winner_id.into(),
            game_id: game_id.into(),
        }
    }

    pub fn is_winner(&self, user_id: &str) -> bool {
        self.winner_id == user_id
    }
}

/// One row of a rendered leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub position: u32,
    pub user_id: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate_percent: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(1, 0, 100)]
    #[case(1, 2, 33)]
    #[case(2, 1, 67)]
    fn win_rate_rounds_to_whole_percent(
        #[case] wins: u32,
        #[case] losses: u32,
        #[case] expected: u32,
    ) {
        let bucket = GameStatistics {
            wins,
            losses,
            rank: 0,
        };
        assert_eq!(bucket.win_rate_percent(), expected);
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let mut stats = PlayerStatistics::new("p1");
        stats.record("g1", true);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "p1",
                "wins": 1,
                "losses": 0,
                "gamesPlayed": 1,
                "rank": 0,
                "gameStats": {"g1": {"wins": 1, "losses": 0, "rank": 0}}
            })
        );
    }
}
