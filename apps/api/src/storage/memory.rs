use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{KvStore, StorageError};

/// In-process store used by tests. `set_available(false)` simulates a
/// backend that has gone away; `fail_writes_after(n)` one that stops
/// accepting writes after `n` more succeed.
#[derive(Clone)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<(Uuid, String), Value>>>,
    available: Arc<AtomicBool>,
    writes_left: Arc<AtomicUsize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
            writes_left: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn fail_writes_after(&self, writes: usize) {
        self.writes_left.store(writes, Ordering::SeqCst);
    }

    fn take_write(&self) -> Result<(), StorageError> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StorageError::Unavailable("memory store rejected write".to_string()))
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory store disabled".to_string()))
        }
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, scope: Uuid, key: &str) -> Result<Option<Value>, StorageError> {
        self.check()?;
        Ok(self.entries.read().await.get(&(scope, key.to_string())).cloned())
    }

    async fn set(&self, scope: Uuid, key: &str, value: Value) -> Result<(), StorageError> {
        self.check()?;
        self.take_write()?;
        self.entries
            .write()
            .await
            .insert((scope, key.to_string()), value);
        Ok(())
    }
}
