use std::sync::Arc;

use chrono::NaiveDate;
use tourneyhub::{
    tournament::Tournament, user::User, AppConfig, AppState, InMemoryRecordStore, TieBreak,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub store: Arc<InMemoryRecordStore>,
    pub players: Vec<User>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    tie_break: TieBreak,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            tie_break: TieBreak::InputOrder,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    #[allow(dead_code)]
    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie", "david"])
    }

    #[allow(dead_code)]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryRecordStore::new());
        let config = AppConfig {
            bcrypt_cost: 4,
            tie_break: self.tie_break,
            ..AppConfig::default()
        };
        let state = AppState::new(store.clone(), &config);
        state
            .catalog
            .initialize_demo_data()
            .await
            .expect("catalog seeding should succeed");

        let mut players = Vec::new();
        for name in &self.players {
            let user = state
                .auth
                .register(name, &format!("{name}@example.com"), "password")
                .await
                .expect("registration should succeed");
            players.push(user);
        }

        TestSetup {
            state,
            store,
            players,
        }
    }
}

impl TestSetup {
    pub fn player(&self, name: &str) -> &User {
        self.players
            .iter()
            .find(|p| p.username == name)
            .expect("player should be registered")
    }

    /// Creates a tournament hosted by the first player that everybody joins
    pub async fn tournament_with_everyone(&self, game_id: &str) -> Tournament {
        let host = &self.players[0];
        let tournament = self
            .state
            .tournaments
            .create_tournament(
                host,
                "Weekend Cup",
                game_id,
                NaiveDate::from_ymd_opt(2026, 11, 7).unwrap(),
            )
            .await
            .expect("tournament creation should succeed");

        for player in &self.players[1..] {
            self.state
                .tournaments
                .join_tournament(player, &tournament.id)
                .await
                .expect("join should succeed");
        }
        tournament
    }

    /// Plays one match and records `winner` as its winner
    pub async fn play(&self, tournament: &Tournament, players: &[&str], winner: &str) {
        let host = &self.players[0];
        let participants = players.iter().map(|p| self.player(p).id.clone()).collect();
        let started = self
            .state
            .tournaments
            .start_match(host, &tournament.id, participants)
            .await
            .expect("match should start");
        self.state
            .tournaments
            .record_match_result(host, &started.id, &self.player(winner).id)
            .await
            .expect("result should be recorded");
    }
}
