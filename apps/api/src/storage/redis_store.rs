use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use super::{KvStore, StorageError};

const KEY_PREFIX: &str = "prompt-catalog";

/// Sync partition. Values are stored as JSON strings under
/// `prompt-catalog:{scope}:{key}`.
#[derive(Clone)]
pub struct RedisKvStore {
    client: redis::Client,
}

impl RedisKvStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)
    }
}

fn redis_key(scope: Uuid, key: &str) -> String {
    format!("{KEY_PREFIX}:{scope}:{key}")
}

fn unavailable(e: redis::RedisError) -> StorageError {
    error!("Sync storage error: {e}");
    StorageError::Unavailable(e.to_string())
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, scope: Uuid, key: &str) -> Result<Option<Value>, StorageError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(redis_key(scope, key)).await.map_err(unavailable)?;
        raw.map(|s| {
            serde_json::from_str(&s).map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
    }

    async fn set(&self, scope: Uuid, key: &str, value: Value) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(redis_key(scope, key), value.to_string())
            .await
            .map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_key_layout() {
        let scope = Uuid::nil();
        assert_eq!(
            redis_key(scope, "banana-favorites"),
            "prompt-catalog:00000000-0000-0000-0000-000000000000:banana-favorites"
        );
    }
}
