pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::prompts::handlers as prompts;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog browsing
        .route("/api/v1/catalog", get(catalog::handle_view))
        .route("/api/v1/catalog/open", post(catalog::handle_open))
        .route("/api/v1/catalog/reload", post(catalog::handle_reload))
        .route("/api/v1/catalog/search", put(catalog::handle_search))
        .route("/api/v1/catalog/category", put(catalog::handle_category))
        .route(
            "/api/v1/catalog/filters/:filter/toggle",
            post(catalog::handle_toggle_filter),
        )
        .route("/api/v1/catalog/sort/toggle", post(catalog::handle_toggle_sort))
        .route("/api/v1/catalog/page", put(catalog::handle_set_page))
        .route("/api/v1/catalog/page/step", post(catalog::handle_step_page))
        // Prompt management
        .route("/api/v1/prompts", post(prompts::handle_save_prompt))
        .route("/api/v1/prompts/:id", delete(prompts::handle_delete_prompt))
        .route(
            "/api/v1/prompts/:id/favorite",
            post(prompts::handle_toggle_favorite),
        )
        .route(
            "/api/v1/prompts/:id/insert",
            post(prompts::handle_insert_prompt),
        )
        .with_state(state)
}
