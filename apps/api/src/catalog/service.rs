use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::registry::SharedSession;
use crate::catalog::session::{CatalogPage, CatalogSession, Device};
use crate::models::notice::Notice;
use crate::state::AppState;

/// Reloads every source into `session`. Favorites that cannot be read are
/// treated as empty and reported as a notice.
pub async fn refresh(state: &AppState, user_id: Uuid, session: &mut CatalogSession) {
    let mut catalog = state.repository.load_all(user_id).await;
    let favorites = match state.favorites.get_all(user_id).await {
        Ok(favorites) => favorites,
        Err(e) => {
            warn!("Failed to read favorites for {user_id}: {e}");
            crate::models::notice::push_notice(&mut catalog.notices, Notice::storage_unavailable());
            Default::default()
        }
    };
    session.replace_data(catalog, favorites);
}

/// Opens (or re-opens) the catalog for a user on a given device class.
/// A new session starts from the persisted sort preference.
pub async fn open_catalog(state: &AppState, user_id: Uuid, device: Device) -> CatalogPage {
    open_session(state, user_id, device).await.1
}

async fn open_session(
    state: &AppState,
    user_id: Uuid,
    device: Device,
) -> (SharedSession, CatalogPage) {
    let page_size = state.config.page_sizes().for_device(device);
    let sort = state.preferences.sort_mode(user_id).await;

    let (shared, created) = state
        .sessions
        .get_or_insert_with(user_id, || CatalogSession::new(page_size, sort))
        .await;
    if created {
        info!(
            "Opened catalog session for {user_id} ({device:?}, {sort:?}); {} active",
            state.sessions.len().await
        );
    }

    let page = {
        let mut session = shared.lock().await;
        session.set_page_size(page_size);
        refresh(state, user_id, &mut session).await;
        session.view()
    };
    (shared, page)
}

/// The user's session, opened on the desktop layout if it does not exist yet.
pub async fn session_for(state: &AppState, user_id: Uuid) -> SharedSession {
    match state.sessions.get(user_id).await {
        Some(existing) => existing,
        None => open_session(state, user_id, Device::default()).await.0,
    }
}
