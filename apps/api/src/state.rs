use std::sync::Arc;

use crate::catalog::registry::SessionRegistry;
use crate::config::Config;
use crate::injector::PromptInserter;
use crate::prompts::favorites::FavoritesStore;
use crate::prompts::preferences::Preferences;
use crate::prompts::repository::PromptRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repository: PromptRepository,
    pub favorites: FavoritesStore,
    pub preferences: Preferences,
    pub sessions: SessionRegistry,
    /// Where `insert` sends prompt text. `RelayInserter` in production.
    pub inserter: Arc<dyn PromptInserter>,
    pub config: Config,
}
