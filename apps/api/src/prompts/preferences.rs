use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::catalog::query::SortMode;
use crate::errors::AppError;
use crate::storage::{read_json, write_json, KvStore, SORT_MODE_KEY};

/// Per-user display preferences in the local partition.
#[derive(Clone)]
pub struct Preferences {
    local: Arc<dyn KvStore>,
}

impl Preferences {
    pub fn new(local: Arc<dyn KvStore>) -> Self {
        Self { local }
    }

    /// The saved sort mode, `recommend` when nothing usable is stored.
    pub async fn sort_mode(&self, scope: Uuid) -> SortMode {
        match read_json::<SortMode>(self.local.as_ref(), scope, SORT_MODE_KEY).await {
            Ok(mode) => mode.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read sort mode for {scope}: {e}");
                SortMode::default()
            }
        }
    }

    pub async fn set_sort_mode(&self, scope: Uuid, mode: SortMode) -> Result<(), AppError> {
        write_json(self.local.as_ref(), scope, SORT_MODE_KEY, &mode).await?;
        Ok(())
    }
}
