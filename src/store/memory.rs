use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{RecordStore, StoreError};

/// In-memory implementation of RecordStore for development and testing
///
/// Data lives only as long as the process does.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a store with pre-populated records
    pub fn with_records(records: Vec<(String, Value)>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let records = self.records.read().await;
        let value = records.get(key).cloned();
        debug!(key, found = value.is_some(), "Loaded record from memory");
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(key.to_string(), value);
        debug!(key, "Saved record in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(key);
        Ok(())
    }
}
