//! Durable key-value storage behind the repository, favorites and preferences.
//!
//! Two partitions exist: `local` (custom prompts, hidden ids, sort preference)
//! lives in PostgreSQL, `sync` (favorites) lives in Redis so it can follow the
//! user across devices. Both sit behind the same `KvStore` trait.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod redis_store;

pub const CUSTOM_PROMPTS_KEY: &str = "banana-custom-prompts";
pub const HIDDEN_IDS_KEY: &str = "banana-hidden-ids";
pub const FAVORITES_KEY: &str = "banana-favorites";
pub const SORT_MODE_KEY: &str = "banana-sort-mode";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("stored value under '{key}' is malformed: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A scoped JSON key-value store. `scope` is the user the value belongs to.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, scope: Uuid, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, scope: Uuid, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Reads and deserializes a value. A missing key yields `None`.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    scope: Uuid,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(scope, key).await? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
    }
}

pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    scope: Uuid,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let value = serde_json::to_value(value).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set(scope, key, value).await
}

/// Reads a list of prompt ids. Older clients stored custom ids as numbers,
/// so numeric entries are accepted and stringified; anything else is skipped.
pub async fn read_id_list(
    store: &dyn KvStore,
    scope: Uuid,
    key: &str,
) -> Result<Vec<String>, StorageError> {
    let raw: Vec<Value> = read_json(store, scope, key).await?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}
