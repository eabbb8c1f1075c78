use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::handlers::{UserIdQuery, UserRequest};
use crate::catalog::service::{refresh, session_for};
use crate::catalog::session::CatalogPage;
use crate::errors::AppError;
use crate::models::prompt::{Prompt, PromptDraft};
use crate::prompts::repository::Removal;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SavePromptRequest {
    pub user_id: Uuid,
    pub prompt: PromptDraft,
    #[serde(default)]
    pub images: Vec<String>,
    /// Id of a built-in prompt this one is an edited copy of.
    pub replaces: Option<String>,
}

#[derive(Serialize)]
pub struct SavePromptResponse {
    pub prompt: Prompt,
    pub catalog: CatalogPage,
}

#[derive(Serialize)]
pub struct DeletePromptResponse {
    pub id: String,
    pub removal: Removal,
    pub catalog: CatalogPage,
}

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub id: String,
    pub is_favorite: bool,
    pub catalog: CatalogPage,
}

#[derive(Serialize)]
pub struct InsertResponse {
    pub id: String,
    pub inserted: bool,
}

/// POST /api/v1/prompts
pub async fn handle_save_prompt(
    State(state): State<AppState>,
    Json(req): Json<SavePromptRequest>,
) -> Result<(StatusCode, Json<SavePromptResponse>), AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;

    let prompt = state
        .repository
        .save_custom(req.user_id, req.prompt, req.images, req.replaces.as_deref())
        .await?;
    refresh(&state, req.user_id, &mut session).await;

    Ok((
        StatusCode::CREATED,
        Json(SavePromptResponse {
            prompt,
            catalog: session.view(),
        }),
    ))
}

/// DELETE /api/v1/prompts/:id
///
/// Custom prompts are deleted; built-ins are hidden for this user.
pub async fn handle_delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DeletePromptResponse>, AppError> {
    let session = session_for(&state, params.user_id).await;
    let mut session = session.lock().await;

    if session.find(&id).is_none() {
        return Err(AppError::NotFound(format!("Prompt {id} not found")));
    }
    let removal = state.repository.delete(params.user_id, &id).await?;
    refresh(&state, params.user_id, &mut session).await;

    Ok(Json(DeletePromptResponse {
        id,
        removal,
        catalog: session.view(),
    }))
}

/// POST /api/v1/prompts/:id/favorite
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<Json<FavoriteResponse>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let mut session = session.lock().await;

    let favorites = state.favorites.toggle(req.user_id, &id).await?;
    let is_favorite = favorites.contains(&id);
    session.replace_favorites(favorites);

    Ok(Json(FavoriteResponse {
        id,
        is_favorite,
        catalog: session.view(),
    }))
}

/// POST /api/v1/prompts/:id/insert
pub async fn handle_insert_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<Json<InsertResponse>, AppError> {
    let session = session_for(&state, req.user_id).await;
    let text = {
        let session = session.lock().await;
        session
            .find(&id)
            .map(|p| p.prompt.clone())
            .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))?
    };

    state.inserter.insert(req.user_id, &text).await?;
    info!("Inserted prompt {id} for {}", req.user_id);
    Ok(Json(InsertResponse { id, inserted: true }))
}
