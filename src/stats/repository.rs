use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{PlayerStatistics, StatsError};
use crate::store::{keys, load_collection, save_typed, RecordStore};

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn load_all(&self) -> Result<Vec<PlayerStatistics>, StatsError>;
    async fn save_all(&self, stats: &[PlayerStatistics]) -> Result<(), StatsError>;
}

/// Keeps the whole statistics collection under the `playerStats` record
pub struct StoreStatsRepository {
    store: Arc<dyn RecordStore>,
}

impl StoreStatsRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StatsRepository for StoreStatsRepository {
    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<PlayerStatistics>, StatsError> {
        let stats: Vec<PlayerStatistics> =
            load_collection(self.store.as_ref(), keys::PLAYER_STATS).await?;
        debug!(player_count = stats.len(), "Loaded player statistics");
        Ok(stats)
    }

    #[instrument(skip(self, stats))]
    async fn save_all(&self, stats: &[PlayerStatistics]) -> Result<(), StatsError> {
        save_typed(self.store.as_ref(), keys::PLAYER_STATS, stats).await?;
        debug!(player_count = stats.len(), "Saved player statistics");
        Ok(())
    }
}
