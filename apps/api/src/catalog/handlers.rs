use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::query::{CatalogFilter, CategorySelection};
use crate::catalog::service::{open_catalog, refresh, session_for};
use crate::catalog::session::{CatalogPage, Device};
use crate::errors::AppError;
use crate::models::notice::Notice;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Body for endpoints that only need to know whose catalog to touch.
#[derive(Deserialize)]
pub struct UserRequest {
    pub user_id: Uuid,
}

/// Where the open request came from. Both open the same catalog.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenTrigger {
    ContextMenu,
    Toolbar,
}

#[derive(Deserialize)]
pub struct OpenRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub device: Device,
    pub trigger: Option<OpenTrigger>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub user_id: Uuid,
    pub category: String,
}

#[derive(Deserialize)]
pub struct PageRequest {
    pub user_id: Uuid,
    pub page: i64,
}

#[derive(Deserialize)]
pub struct PageStepRequest {
    pub user_id: Uuid,
    pub delta: i64,
}

/// POST /api/v1/catalog/open
pub async fn handle_open(
    State(state): State<AppState>,
    Json(req): Json<OpenRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    debug!("Catalog open for {} via {:?}", req.user_id, req.trigger);
    Ok(Json(open_catalog(&state, req.user_id, req.device).await))
}

/// GET /api/v1/catalog
pub async fn handle_view(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, params.user_id).await;
    let page = session.lock().await.view();
    Ok(Json(page))
}

/// POST /api/v1/catalog/reload
pub async fn handle_reload(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    refresh(&state, req.user_id, &mut session).await;
    Ok(Json(session.view()))
}

/// PUT /api/v1/catalog/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    session.set_keyword(req.keyword);
    Ok(Json(session.view()))
}

/// PUT /api/v1/catalog/category
pub async fn handle_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    session.set_category(CategorySelection::from_label(&req.category));
    Ok(Json(session.view()))
}

/// POST /api/v1/catalog/filters/:filter/toggle
pub async fn handle_toggle_filter(
    State(state): State<AppState>,
    Path(filter): Path<CatalogFilter>,
    Json(req): Json<UserRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    session.toggle_filter(filter);
    Ok(Json(session.view()))
}

/// POST /api/v1/catalog/sort/toggle
///
/// The new mode is remembered for future sessions. If that write fails the
/// toggle still applies and the view carries a notice.
pub async fn handle_toggle_sort(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    let sort = session.toggle_sort();
    if let Err(e) = state.preferences.set_sort_mode(req.user_id, sort).await {
        warn!("Failed to persist sort mode for {}: {e}", req.user_id);
        session.push_notice(Notice::storage_unavailable());
    }
    Ok(Json(session.view()))
}

/// PUT /api/v1/catalog/page
pub async fn handle_set_page(
    State(state): State<AppState>,
    Json(req): Json<PageRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    session.set_page(req.page);
    Ok(Json(session.view()))
}

/// POST /api/v1/catalog/page/step
pub async fn handle_step_page(
    State(state): State<AppState>,
    Json(req): Json<PageStepRequest>,
) -> Result<Json<CatalogPage>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;
    session.change_page(req.delta);
    Ok(Json(session.view()))
}
