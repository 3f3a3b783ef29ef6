use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, instrument};

use super::{RecordStore, StoreError};

/// Directory-backed store: every key is kept as `<root>/<key>.json`.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// record, so a reader never observes a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileRecordStore {
    root: PathBuf,
}

impl JsonFileRecordStore {
    /// Opens (and creates if needed) the data directory
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "Opened file record store");
        Ok(Self { root })
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl RecordStore for JsonFileRecordStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let bytes = match tokio::fs::read(self.record_path(key)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(key, "No record file");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.record_path(key);
        let staging = self.root.join(format!(".{key}.json.tmp"));

        let bytes = serde_json::to_vec_pretty(&value)?;
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &path).await?;

        debug!(key, path = %path.display(), "Record written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.record_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load_typed;
    use serde_json::json;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tourneyhub-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn persists_records_across_instances() {
        let dir = scratch_dir();

        let store = JsonFileRecordStore::open(&dir).await.unwrap();
        store
            .save("playerStats", json!([{"userId": "p1", "wins": 1}]))
            .await
            .unwrap();

        let reopened = JsonFileRecordStore::open(&dir).await.unwrap();
        let value = reopened.load("playerStats").await.unwrap();
        assert_eq!(value, Some(json!([{"userId": "p1", "wins": 1}])));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_and_removed_records_load_as_none() {
        let dir = scratch_dir();
        let store = JsonFileRecordStore::open(&dir).await.unwrap();

        assert!(store.load("games").await.unwrap().is_none());

        store.save("games", json!([])).await.unwrap();
        store.remove("games").await.unwrap();
        assert!(store.load("games").await.unwrap().is_none());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_and_typed_load_skips_it() {
        let dir = scratch_dir();
        let store = JsonFileRecordStore::open(&dir).await.unwrap();
        tokio::fs::write(dir.join("matches.json"), b"{not json")
            .await
            .unwrap();

        assert!(matches!(
            store.load("matches").await,
            Err(StoreError::Serialization(_))
        ));

        let typed: Option<Vec<Value>> = load_typed(&store, "matches").await.unwrap();
        assert!(typed.is_none());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
