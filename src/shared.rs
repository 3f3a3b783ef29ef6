use std::sync::Arc;
use thiserror::Error;

use crate::catalog::GameCatalog;
use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::notification::NotificationService;
use crate::stats::{RankingCalculator, StatsError, StatsService, StoreStatsRepository};
use crate::store::{RecordStore, StoreError};
use crate::tournament::TournamentService;
use crate::user::AuthService;

/// Shared application state containing all services over one record store
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub catalog: Arc<GameCatalog>,
    pub auth: Arc<AuthService>,
    pub stats: Arc<StatsService>,
    pub tournaments: Arc<TournamentService>,
    pub chat: Arc<ChatService>,
    pub notifications: Arc<NotificationService>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &AppConfig) -> Self {
        let catalog = Arc::new(GameCatalog::new(store.clone()));
        let auth = Arc::new(AuthService::new(store.clone(), config.bcrypt_cost));
        let stats = Arc::new(StatsService::new(
            Arc::new(StoreStatsRepository::new(store.clone())),
            catalog.clone(),
            RankingCalculator::new(config.tie_break),
        ));
        let notifications = Arc::new(NotificationService::new(store.clone()));
        let tournaments = Arc::new(TournamentService::new(
            store.clone(),
            catalog.clone(),
            stats.clone(),
            notifications.clone(),
        ));
        let chat = Arc::new(ChatService::new(store.clone()));

        Self {
            store,
            catalog,
            auth,
            stats,
            tournaments,
            chat,
            notifications,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error")]
    Internal,
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::PasswordHash(err.to_string())
    }
}
