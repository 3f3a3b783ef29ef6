use std::collections::HashSet;

use super::{MatchOutcome, PlayerStatistics, StatsError};

/// Folds one completed match into the statistics collection.
///
/// The outcome is validated before anything is touched, so on error `stats`
/// is exactly as it was. Each call counts the match again: callers must
/// submit a given match once.
pub fn apply(outcome: &MatchOutcome, stats: &mut Vec<PlayerStatistics>) -> Result<(), StatsError> {
    validate(outcome)?;

    for participant in &outcome.participants {
        let won = outcome.is_winner(participant);
        let index = match stats.iter().position(|s| &s.user_id == participant) {
            Some(index) => index,
            None => {
                stats.push(PlayerStatistics::new(participant.clone()));
                stats.len() - 1
            }
        };
        stats[index].record(&outcome.game_id, won);
    }

    Ok(())
}

/// Checks an outcome without touching any statistics.
pub fn validate(outcome: &MatchOutcome) -> Result<(), StatsError> {
    if !outcome.participants.contains(&outcome.winner_id) {
        return Err(StatsError::InvalidOutcome(format!(
            "winner {} is not a participant",
            outcome.winner_id
        )));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = outcome.participants.iter().find(|p| !seen.insert(*p)) {
        return Err(StatsError::InvalidOutcome(format!(
            "participant {duplicate} is listed more than once"
        )));
    }

    Ok(())
}
