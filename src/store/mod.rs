pub mod keys;

mod errors;
mod file;
mod memory;

pub use errors::StoreError;
pub use file::JsonFileRecordStore;
pub use memory::InMemoryRecordStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::error;

/// Key-value persistence substrate. Keys are fixed strings (see [`keys`]),
/// values are arbitrary JSON documents.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn save(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Loads and decodes the record under `key`.
///
/// A record that does not decode into `T` is logged and treated as absent,
/// so callers fall back to their empty default.
pub async fn load_typed<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let value = match store.load(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(None),
        Err(StoreError::Serialization(err)) => {
            error!(key, error = %err, "Stored record is not valid JSON");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(err) => {
            error!(key, error = %err, "Stored record has an unexpected shape");
            Ok(None)
        }
    }
}

/// Loads a collection record, defaulting to empty when absent.
pub async fn load_collection<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    Ok(load_typed(store, key).await?.unwrap_or_default())
}

pub async fn save_typed<T: Serialize + ?Sized>(
    store: &dyn RecordStore,
    key: &str,
    record: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(record)?;
    store.save(key, value).await
}
