use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::flash::is_flash_id;
use crate::errors::AppError;
use crate::feeds::{FeedSource, PromptFeed};
use crate::models::notice::{push_notice, Notice};
use crate::models::prompt::{Prompt, PromptDraft, PromptOrigin};
use crate::prompts::merge::{collect_categories, ingest, merge_sources};
use crate::storage::{
    read_id_list, read_json, write_json, KvStore, StorageError, CUSTOM_PROMPTS_KEY, HIDDEN_IDS_KEY,
};

/// Result of a full repository load. Ordering is the merge order; the
/// catalog engine decides what the user actually sees.
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub prompts: Vec<Prompt>,
    pub categories: Vec<String>,
    pub notices: Vec<Notice>,
}

/// What a delete request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    Deleted,
    Hidden,
}

/// Built-in feeds plus the user's custom prompts and hidden ids.
#[derive(Clone)]
pub struct PromptRepository {
    local: Arc<dyn KvStore>,
    feeds: Arc<dyn PromptFeed>,
}

impl PromptRepository {
    pub fn new(local: Arc<dyn KvStore>, feeds: Arc<dyn PromptFeed>) -> Self {
        Self { local, feeds }
    }

    pub async fn custom_prompts(&self, scope: Uuid) -> Result<Vec<Prompt>, StorageError> {
        let raw: Vec<Value> = read_json(self.local.as_ref(), scope, CUSTOM_PROMPTS_KEY)
            .await?
            .unwrap_or_default();
        Ok(ingest(raw, PromptOrigin::Custom))
    }

    pub async fn hidden_ids(&self, scope: Uuid) -> Result<Vec<String>, StorageError> {
        read_id_list(self.local.as_ref(), scope, HIDDEN_IDS_KEY).await
    }

    async fn write_custom(&self, scope: Uuid, prompts: &[Prompt]) -> Result<(), StorageError> {
        write_json(self.local.as_ref(), scope, CUSTOM_PROMPTS_KEY, prompts).await
    }

    async fn fetch_feed(&self, source: FeedSource, notices: &mut Vec<Notice>) -> Vec<Prompt> {
        match self.feeds.fetch(source).await {
            Ok(raw) => ingest(raw, source.origin()),
            Err(e) => {
                warn!("Failed to fetch {} prompts: {e}", source.label());
                push_notice(notices, Notice::feed_unavailable(source.label()));
                Vec::new()
            }
        }
    }

    /// Loads and merges every source. Never fails: an unreachable store or
    /// feed contributes nothing and leaves a notice behind.
    pub async fn load_all(&self, scope: Uuid) -> LoadedCatalog {
        let mut notices = Vec::new();

        let hidden: HashSet<String> = match self.hidden_ids(scope).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!("Failed to read hidden ids for {scope}: {e}");
                push_notice(&mut notices, Notice::storage_unavailable());
                HashSet::new()
            }
        };

        let custom = match self.custom_prompts(scope).await {
            Ok(prompts) => prompts,
            Err(e) => {
                warn!("Failed to read custom prompts for {scope}: {e}");
                push_notice(&mut notices, Notice::storage_unavailable());
                Vec::new()
            }
        };

        let mut daily_notices = Vec::new();
        let mut core_notices = Vec::new();
        let (daily, core) = tokio::join!(
            self.fetch_feed(FeedSource::Daily, &mut daily_notices),
            self.fetch_feed(FeedSource::Core, &mut core_notices),
        );
        for notice in daily_notices.into_iter().chain(core_notices) {
            push_notice(&mut notices, notice);
        }

        let prompts = merge_sources(custom, daily, core, &hidden);
        info!("Loaded {} prompts for {scope}", prompts.len());

        LoadedCatalog {
            categories: collect_categories(&prompts),
            prompts,
            notices,
        }
    }

    /// Creates or updates a custom prompt.
    ///
    /// `replaces` names a built-in prompt the new one supersedes; that id is
    /// hidden so the original stops showing up. The hide happens only after
    /// the copy is stored, and a failed hide leaves the copy saved.
    pub async fn save_custom(
        &self,
        scope: Uuid,
        draft: PromptDraft,
        images: Vec<String>,
        replaces: Option<&str>,
    ) -> Result<Prompt, AppError> {
        draft.validate().map_err(AppError::Validation)?;
        if draft.id.as_deref().is_some_and(is_flash_id) || replaces.is_some_and(is_flash_id) {
            return Err(AppError::Validation(
                "The assistant prompt cannot be edited".to_string(),
            ));
        }

        let mut custom = self.custom_prompts(scope).await?;
        let hides = replaces.filter(|original| !custom.iter().any(|p| p.id == *original));

        let id = match draft.id.clone() {
            Some(id) if !id.trim().is_empty() => id,
            _ => next_custom_id(&custom),
        };
        let prompt = draft.into_custom_prompt(id, images);

        match custom.iter().position(|p| p.id == prompt.id) {
            Some(index) => custom[index] = prompt.clone(),
            None => custom.insert(0, prompt.clone()),
        }
        self.write_custom(scope, &custom).await?;
        info!("Saved custom prompt {} for {scope}", prompt.id);

        if let Some(original) = hides {
            if let Err(e) = self.hide(scope, original).await {
                warn!("Saved {} but could not hide {original} for {scope}: {e}", prompt.id);
            }
        }
        Ok(prompt)
    }

    /// Removes a custom prompt. Returns whether anything was removed.
    pub async fn delete_custom(&self, scope: Uuid, id: &str) -> Result<bool, AppError> {
        let mut custom = self.custom_prompts(scope).await?;
        let before = custom.len();
        custom.retain(|p| p.id != id);
        if custom.len() == before {
            return Ok(false);
        }
        self.write_custom(scope, &custom).await?;
        info!("Deleted custom prompt {id} for {scope}");
        Ok(true)
    }

    /// Adds `id` to the hidden set. Idempotent.
    pub async fn hide(&self, scope: Uuid, id: &str) -> Result<(), AppError> {
        let mut hidden = self.hidden_ids(scope).await?;
        if hidden.iter().any(|h| h == id) {
            return Ok(());
        }
        hidden.push(id.to_string());
        write_json(self.local.as_ref(), scope, HIDDEN_IDS_KEY, &hidden).await?;
        info!("Hid prompt {id} for {scope}");
        Ok(())
    }

    /// Deletes a custom prompt, or hides a built-in one (built-ins cannot be
    /// removed from their feed).
    pub async fn delete(&self, scope: Uuid, id: &str) -> Result<Removal, AppError> {
        if is_flash_id(id) {
            return Err(AppError::Validation(
                "The assistant prompt cannot be deleted".to_string(),
            ));
        }
        if self.delete_custom(scope, id).await? {
            return Ok(Removal::Deleted);
        }
        self.hide(scope, id).await?;
        Ok(Removal::Hidden)
    }
}

/// Millisecond timestamp, bumped until it is unused.
fn next_custom_id(existing: &[Prompt]) -> String {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while existing.iter().any(|p| p.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
