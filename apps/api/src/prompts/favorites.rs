use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::{read_id_list, write_json, KvStore, StorageError, FAVORITES_KEY};

/// Favorite prompt ids, kept in the sync partition. Ids are not checked
/// against the catalog; a dangling id simply never matches.
#[derive(Clone)]
pub struct FavoritesStore {
    sync: Arc<dyn KvStore>,
}

impl FavoritesStore {
    pub fn new(sync: Arc<dyn KvStore>) -> Self {
        Self { sync }
    }

    async fn read(&self, scope: Uuid) -> Result<Vec<String>, StorageError> {
        read_id_list(self.sync.as_ref(), scope, FAVORITES_KEY).await
    }

    /// Current favorites. Callers decide how to degrade when the store is down.
    pub async fn get_all(&self, scope: Uuid) -> Result<HashSet<String>, StorageError> {
        Ok(self.read(scope).await?.into_iter().collect())
    }

    /// Adds `id` if absent, removes it if present. Returns the new set.
    pub async fn toggle(&self, scope: Uuid, id: &str) -> Result<HashSet<String>, AppError> {
        let mut favorites = self.read(scope).await?;
        match favorites.iter().position(|f| f == id) {
            Some(index) => {
                favorites.remove(index);
                info!("Unfavorited {id} for {scope}");
            }
            None => {
                favorites.push(id.to_string());
                info!("Favorited {id} for {scope}");
            }
        }
        write_json(self.sync.as_ref(), scope, FAVORITES_KEY, &favorites).await?;
        Ok(favorites.into_iter().collect())
    }
}
