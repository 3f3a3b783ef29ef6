use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::models::Game;
use crate::store::{keys, load_collection, load_typed, save_typed, RecordStore, StoreError};

/// Read access to the game catalog stored under `games`
pub struct GameCatalog {
    store: Arc<dyn RecordStore>,
}

impl GameCatalog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Seeds the demo catalog if the store has none yet.
    /// Returns whether anything was written.
    #[instrument(skip(self))]
    pub async fn initialize_demo_data(&self) -> Result<bool, StoreError> {
        let existing: Option<Vec<Game>> = load_typed(self.store.as_ref(), keys::GAMES).await?;
        if existing.is_some() {
            debug!("Game catalog already present");
            return Ok(false);
        }

        let games = Game::demo_catalog();
        save_typed(self.store.as_ref(), keys::GAMES, &games).await?;
        info!(game_count = games.len(), "Seeded demo game catalog");
        Ok(true)
    }

    pub async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        load_collection(self.store.as_ref(), keys::GAMES).await
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Option<Game>, StoreError> {
        Ok(self
            .list_games()
            .await?
            .into_iter()
            .find(|game| game.id == game_id))
    }

    /// Identifiers of every known game, in catalog order
    pub async fn game_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .list_games()
            .await?
            .into_iter()
            .map(|game| game.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRecordStore;

    #[tokio::test]
    async fn seeds_demo_catalog_once() {
        let store = Arc::new(InMemoryRecordStore::new());
        let catalog = GameCatalog::new(store.clone());

        assert!(catalog.initialize_demo_data().await.unwrap());
        assert!(!catalog.initialize_demo_data().await.unwrap());

        assert_eq!(catalog.game_ids().await.unwrap(), vec!["1", "2", "3", "4"]);
        let valorant = catalog.get_game("4").await.unwrap().unwrap();
        assert_eq!(valorant.name, "Valorant");
        assert!(catalog.get_game("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn keeps_existing_catalog() {
        let store = Arc::new(InMemoryRecordStore::new());
        let custom = vec![Game {
            id: "chess".to_string(),
            name: "Chess".to_string(),
            image: String::new(),
            description: String::new(),
        }];
        save_typed(store.as_ref(), keys::GAMES, &custom).await.unwrap();

        let catalog = GameCatalog::new(store);
        assert!(!catalog.initialize_demo_data().await.unwrap());
        assert_eq!(catalog.list_games().await.unwrap(), custom);
    }
}
