use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::models::{Match, MatchStatus, Tournament, TournamentFilter, TournamentStatus};
use crate::catalog::GameCatalog;
use crate::notification::{NotificationKind, NotificationService};
use crate::shared::AppError;
use crate::stats::{self, MatchOutcome, PlayerStatistics, StatsService};
use crate::store::{keys, load_collection, save_typed, RecordStore};
use crate::user::User;

/// Tournament and match management.
///
/// Owns the scheduled -> completed transition of a match, which is what
/// keeps every match from being counted in the statistics more than once.
pub struct TournamentService {
    store: Arc<dyn RecordStore>,
    catalog: Arc<GameCatalog>,
    stats: Arc<StatsService>,
    notifications: Arc<NotificationService>,
}

impl TournamentService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        catalog: Arc<GameCatalog>,
        stats: Arc<StatsService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            store,
            catalog,
            stats,
            notifications,
        }
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn create_tournament(
        &self,
        actor: &User,
        name: &str,
        game_id: &str,
        start_date: NaiveDate,
    ) -> Result<Tournament, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Tournament name is required".to_string()));
        }
        if self.catalog.get_game(game_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Game {game_id} not found")));
        }

        let tournament = Tournament::new(
            name.to_string(),
            game_id.to_string(),
            actor.id.clone(),
            start_date,
        );

        let mut tournaments = self.list_tournaments().await?;
        tournaments.push(tournament.clone());
        self.save_tournaments(&tournaments).await?;

        self.notifications
            .add_notification(
                &actor.id,
                NotificationKind::TournamentInvite,
                format!("You created a new tournament: {}", tournament.name),
                Some(&tournament.id),
            )
            .await?;

        info!(tournament_id = %tournament.id, "Tournament created");
        Ok(tournament)
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn join_tournament(
        &self,
        actor: &User,
        tournament_id: &str,
    ) -> Result<Tournament, AppError> {
        let mut tournaments = self.list_tournaments().await?;
        let tournament = tournaments
            .iter_mut()
            .find(|t| t.id == tournament_id)
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        if tournament.has_participant(&actor.id) {
            return Err(AppError::Conflict(
                "You are already in this tournament".to_string(),
            ));
        }
        if tournament.status != TournamentStatus::Upcoming {
            return Err(AppError::Validation(format!(
                "Tournament is {} and no longer accepts participants",
                tournament.status
            )));
        }

        tournament.participants.push(actor.id.clone());
        let joined = tournament.clone();
        self.save_tournaments(&tournaments).await?;

        self.notifications
            .add_notification(
                &actor.id,
                NotificationKind::TournamentInvite,
                format!("You joined the tournament: {}", joined.name),
                Some(&joined.id),
            )
            .await?;

        info!(
            tournament_id = %joined.id,
            participant_count = joined.participants.len(),
            "Joined tournament"
        );
        Ok(joined)
    }

    /// Schedules a match between tournament participants.
    /// The first match moves an upcoming tournament to active.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn start_match(
        &self,
        actor: &User,
        tournament_id: &str,
        participants: Vec<String>,
    ) -> Result<Match, AppError> {
        let mut tournaments = self.list_tournaments().await?;
        let tournament = tournaments
            .iter_mut()
            .find(|t| t.id == tournament_id)
            .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

        if participants.is_empty() {
            return Err(AppError::Validation(
                "A match needs at least one player".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if !participants.iter().all(|p| seen.insert(p)) {
            return Err(AppError::Validation(
                "A player cannot appear twice in a match".to_string(),
            ));
        }
        if !participants.iter().all(|p| tournament.has_participant(p)) {
            return Err(AppError::Validation(
                "All players must be tournament participants".to_string(),
            ));
        }

        let new_match = Match::new(tournament, participants);

        if tournament.status == TournamentStatus::Upcoming {
            tournament.status = TournamentStatus::Active;
            debug!(tournament_id = %tournament.id, "Tournament is now active");
        }
        let tournament_name = tournament.name.clone();
        self.save_tournaments(&tournaments).await?;

        let mut matches = self.load_matches().await?;
        matches.push(new_match.clone());
        self.save_matches(&matches).await?;

        for participant in &new_match.participants {
            self.notifications
                .add_notification(
                    participant,
                    NotificationKind::MatchReminder,
                    format!("You have a match scheduled in {tournament_name}"),
                    Some(&new_match.id),
                )
                .await?;
        }

        info!(match_id = %new_match.id, "Match started");
        Ok(new_match)
    }

    /// Completes a scheduled match and feeds it to the statistics.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn record_match_result(
        &self,
        actor: &User,
        match_id: &str,
        winner_id: &str,
    ) -> Result<(Match, Vec<PlayerStatistics>), AppError> {
        let mut matches = self.load_matches().await?;
        let game_match = matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        if game_match.is_completed() {
            warn!(match_id, "Match result submitted twice");
            return Err(AppError::Conflict(
                "Match has already been completed".to_string(),
            ));
        }
        if !game_match.has_participant(winner_id) {
            return Err(AppError::Validation(
                "Winner must be a match participant".to_string(),
            ));
        }

        let outcome = MatchOutcome::new(
            game_match.participants.clone(),
            winner_id,
            game_match.game_id.clone(),
        );
        // Nothing may be written for an outcome the statistics would reject
        stats::validate(&outcome)?;

        game_match.winner_id = Some(winner_id.to_string());
        game_match.status = MatchStatus::Completed;
        let completed = game_match.clone();
        self.save_matches(&matches).await?;

        let stats = self.stats.record_outcome(&outcome).await?;

        let tournament_name = self
            .get_tournament(&completed.tournament_id)
            .await?
            .map(|t| t.name)
            .unwrap_or_else(|| "a tournament".to_string());
        for participant in &completed.participants {
            let verdict = if participant == winner_id { "won" } else { "lost" };
            self.notifications
                .add_notification(
                    participant,
                    NotificationKind::MatchResult,
                    format!("You {verdict} your match in {tournament_name}"),
                    Some(&completed.id),
                )
                .await?;
        }

        info!(match_id, winner_id, "Match result recorded");
        Ok((completed, stats))
    }

    pub async fn list_tournaments(&self) -> Result<Vec<Tournament>, AppError> {
        Ok(load_collection(self.store.as_ref(), keys::TOURNAMENTS).await?)
    }

    pub async fn get_tournament(&self, tournament_id: &str) -> Result<Option<Tournament>, AppError> {
        Ok(self
            .list_tournaments()
            .await?
            .into_iter()
            .find(|t| t.id == tournament_id))
    }

    /// Tournaments the actor takes part in
    pub async fn user_tournaments(&self, actor: &User) -> Result<Vec<Tournament>, AppError> {
        Ok(self
            .list_tournaments()
            .await?
            .into_iter()
            .filter(|t| t.has_participant(&actor.id))
            .collect())
    }

    pub async fn list_matches(&self, tournament_id: &str) -> Result<Vec<Match>, AppError> {
        Ok(self
            .load_matches()
            .await?
            .into_iter()
            .filter(|m| m.tournament_id == tournament_id)
            .collect())
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Option<Match>, AppError> {
        Ok(self.load_matches().await?.into_iter().find(|m| m.id == match_id))
    }

    /// Filters tournaments and searches their name and game name,
    /// case-insensitively
    pub async fn search_tournaments(
        &self,
        viewer: Option<&User>,
        filter: TournamentFilter,
        query: &str,
    ) -> Result<Vec<Tournament>, AppError> {
        let games = self.catalog.list_games().await?;
        let query = query.to_lowercase();
        let viewer_id = viewer.map(|u| u.id.as_str());

        Ok(self
            .list_tournaments()
            .await?
            .into_iter()
            .filter(|t| filter.matches(t, viewer_id))
            .filter(|t| {
                let game_name = games
                    .iter()
                    .find(|g| g.id == t.game_id)
                    .map(|g| g.name.to_lowercase())
                    .unwrap_or_default();
                t.name.to_lowercase().contains(&query) || game_name.contains(&query)
            })
            .collect())
    }

    async fn save_tournaments(&self, tournaments: &[Tournament]) -> Result<(), AppError> {
        Ok(save_typed(self.store.as_ref(), keys::TOURNAMENTS, tournaments).await?)
    }

    async fn load_matches(&self) -> Result<Vec<Match>, AppError> {
        Ok(load_collection(self.store.as_ref(), keys::MATCHES).await?)
    }

    async fn save_matches(&self, matches: &[Match]) -> Result<(), AppError> {
        Ok(save_typed(self.store.as_ref(), keys::MATCHES, matches).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{register, test_state};
    use crate::shared::AppState;
    use crate::stats::StatsError;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
    }

    async fn tournament_with(state: &AppState, players: &[&User]) -> Tournament {
        let host = players[0];
        let tournament = state
            .tournaments
            .create_tournament(host, "Friday Frags", "1", start_date())
            .await
            .unwrap();
        for player in &players[1..] {
            state
                .tournaments
                .join_tournament(player, &tournament.id)
                .await
                .unwrap();
        }
        state
            .tournaments
            .get_tournament(&tournament.id)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn create_tournament_validates_input() {
        let state = test_state().await;
        let ann = register(&state, "ann").await;

        let blank = state
            .tournaments
            .create_tournament(&ann, "  ", "1", start_date())
            .await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let unknown_game = state
            .tournaments
            .create_tournament(&ann, "Cup", "99", start_date())
            .await;
        assert!(matches!(unknown_game, Err(AppError::NotFound(_))));

        let created = state
            .tournaments
            .create_tournament(&ann, "Cup", "2", start_date())
            .await
            .unwrap();
        assert_eq!(created.status, TournamentStatus::Upcoming);
        assert_eq!(created.participants, vec![ann.id.clone()]);

        let notes = state.notifications.notifications_for(&ann.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "You created a new tournament: Cup");
    }

    #[tokio::test]
    async fn join_rejects_missing_and_repeat_joins() {
        let state = test_state().await;
        let ann = register(&state, "ann").await;
        let bob = register(&state, "bob").await;
        let tournament = tournament_with(&state, &[&ann, &bob]).await;

        assert_eq!(tournament.participants, vec![ann.id.clone(), bob.id.clone()]);

        let again = state.tournaments.join_tournament(&bob, &tournament.id).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let missing = state.tournaments.join_tournament(&bob, "nope").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn start_match_requires_tournament_players_and_activates() {
        let state = test_state().await;
        let ann = register(&state, "ann").await;
        let bob = register(&state, "bob").await;
        let cat = register(&state, "cat").await;
        let tournament = tournament_with(&state, &[&ann, &bob]).await;

        let outsider = state
            .tournaments
            .start_match(&ann, &tournament.id, vec![ann.id.clone(), cat.id.clone()])
            .await;
        assert!(matches!(outsider, Err(AppError::Validation(_))));

        let twice = state
            .tournaments
            .start_match(&ann, &tournament.id, vec![ann.id.clone(), ann.id.clone()])
            .await;
        assert!(matches!(twice, Err(AppError::Validation(_))));

        let empty = state
            .tournaments
            .start_match(&ann, &tournament.id, vec![])
            .await;
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let started = state
            .tournaments
            .start_match(&ann, &tournament.id, vec![ann.id.clone(), bob.id.clone()])
            .await
            .unwrap();
        assert_eq!(started.status, MatchStatus::Scheduled);
        assert_eq!(started.game_id, "1");

        let refreshed = state
            .tournaments
            .get_tournament(&tournament.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.status, TournamentStatus::Active);

        let late = state.tournaments.join_tournament(&cat, &tournament.id).await;
        assert!(matches!(late, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn match_result_is_counted_exactly_once() {
        let state = test_state().await;
        let ann = register(&state, "ann").await;
        let bob = register(&state, "bob").await;
        let tournament = tournament_with(&state, &[&ann, &bob]).await;
        let started = state
            .tournaments
            .start_match(&ann, &tournament.id, vec![ann.id.clone(), bob.id.clone()])
            .await
            .unwrap();

        let bad_winner = state
            .tournaments
            .record_match_result(&ann, &started.id, "stranger")
            .await;
        assert!(matches!(bad_winner, Err(AppError::Validation(_))));
        assert!(state.stats.all_stats().await.unwrap().is_empty());

        let (completed, stats) = state
            .tournaments
            .record_match_result(&ann, &started.id, &bob.id)
            .await
            .unwrap();
        assert_eq!(completed.status, MatchStatus::Completed);
        assert_eq!(completed.winner_id.as_deref(), Some(bob.id.as_str()));
        assert_eq!(stats.len(), 2);

        let again = state
            .tournaments
            .record_match_result(&ann, &started.id, &bob.id)
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let bob_stats = state.stats.user_stats(&bob.id).await.unwrap().unwrap();
        assert_eq!((bob_stats.wins, bob_stats.games_played, bob_stats.rank), (1, 1, 1));
        assert_eq!(bob_stats.game("1").unwrap().rank, 1);

        let bob_notes = state.notifications.notifications_for(&bob.id).await.unwrap();
        assert!(bob_notes
            .iter()
            .any(|n| n.kind == NotificationKind::MatchResult && n.content.contains("won")));
    }

    #[tokio::test]
    async fn search_filters_by_status_membership_and_text() {
        let state = test_state().await;
        let ann = register(&state, "ann").await;
        let bob = register(&state, "bob").await;

        let frags = state
            .tournaments
            .create_tournament(&ann, "Friday Frags", "1", start_date())
            .await
            .unwrap();
        let valorant = state
            .tournaments
            .create_tournament(&bob, "Spike Rush", "4", start_date())
            .await
            .unwrap();
        state
            .tournaments
            .start_match(&bob, &valorant.id, vec![bob.id.clone()])
            .await
            .unwrap();

        let joined = state
            .tournaments
            .search_tournaments(Some(&ann), TournamentFilter::Joined, "")
            .await
            .unwrap();
        assert_eq!(joined, vec![frags.clone()]);

        let active = state
            .tournaments
            .search_tournaments(None, TournamentFilter::Active, "")
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, valorant.id);

        let by_game = state
            .tournaments
            .search_tournaments(None, TournamentFilter::All, "VALOR")
            .await
            .unwrap();
        assert_eq!(by_game.len(), 1);
        assert_eq!(by_game[0].id, valorant.id);

        let by_name = state
            .tournaments
            .search_tournaments(None, TournamentFilter::All, "frags")
            .await
            .unwrap();
        assert_eq!(by_name, vec![frags]);

        assert_eq!(state.tournaments.user_tournaments(&bob).await.unwrap().len(), 1);
        assert_eq!(state.tournaments.list_matches(&valorant.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_outcome_leaves_match_scheduled() {
        let state = test_state().await;
        let ann = register(&state, "ann").await;
        let bob = register(&state, "bob").await;
        let tournament = tournament_with(&state, &[&ann, &bob]).await;

        // Stored matches written before duplicates were refused at start time
        let stored = Match::new(&tournament, vec![ann.id.clone(), bob.id.clone(), bob.id.clone()]);
        save_typed(state.store.as_ref(), keys::MATCHES, &[stored.clone()])
            .await
            .unwrap();

        for _ in 0..2 {
            let result = state
                .tournaments
                .record_match_result(&ann, &stored.id, &ann.id)
                .await;
            assert!(matches!(
                result,
                Err(AppError::Stats(StatsError::InvalidOutcome(_)))
            ));
        }

        let after = state.tournaments.get_match(&stored.id).await.unwrap().unwrap();
        assert_eq!(after.status, MatchStatus::Scheduled);
        assert!(after.winner_id.is_none());
        assert!(state.stats.all_stats().await.unwrap().is_empty());
    }
}
