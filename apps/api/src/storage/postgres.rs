use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::{KvStore, StorageError};

/// Local partition backed by the `kv_entries` table (see `db::ensure_schema`).
#[derive(Clone)]
pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(e: sqlx::Error) -> StorageError {
    error!("Local storage error: {e}");
    StorageError::Unavailable(e.to_string())
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, scope: Uuid, key: &str) -> Result<Option<Value>, StorageError> {
        sqlx::query_scalar::<_, Value>("SELECT value FROM kv_entries WHERE scope = $1 AND key = $2")
            .bind(scope)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)
    }

    async fn set(&self, scope: Uuid, key: &str, value: Value) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (scope, key, value, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (scope, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(scope)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }
}
