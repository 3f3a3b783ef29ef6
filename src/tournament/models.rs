use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TournamentStatus {
    Upcoming,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub game_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub participants: Vec<String>, // user ids, creator first
    pub status: TournamentStatus,
    #[serde(default)]
    pub winners: Vec<String>,
}

impl Tournament {
    /// A new upcoming tournament; the creator joins automatically
    pub fn new(name: String, game_id: String, created_by: String, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            game_id,
            participants: vec![created_by.clone()],
            created_by,
            created_at: Utc::now(),
            start_date,
            status: TournamentStatus::Upcoming,
            winners: vec![],
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub tournament_id: String,
    pub game_id: String,
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    pub date: DateTime<Utc>,
    pub status: MatchStatus,
}

impl Match {
    pub fn new(tournament: &Tournament, participants: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tournament_id: tournament.id.clone(),
            game_id: tournament.game_id.clone(),
            participants,
            winner_id: None,
            date: Utc::now(),
            status: MatchStatus::Scheduled,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

/// Tournament list filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TournamentFilter {
    #[default]
    All,
    Joined,
    Upcoming,
    Active,
    Completed,
}

impl TournamentFilter {
    pub fn matches(&self, tournament: &Tournament, viewer_id: Option<&str>) -> bool {
        match self {
            TournamentFilter::All => true,
            TournamentFilter::Joined => {
                viewer_id.is_some_and(|user_id| tournament.has_participant(user_id))
            }
            TournamentFilter::Upcoming => tournament.status == TournamentStatus::Upcoming,
            TournamentFilter::Active => tournament.status == TournamentStatus::Active,
            TournamentFilter::Completed => tournament.status == TournamentStatus::Completed,
        }
    }
}
