use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ping", get(handlers::ping))
        .route("/service-worker.js", get(handlers::service_worker))
        .route("/manifest.json", get(handlers::web_manifest))
        .route("/api/entries", get(handlers::get_entries).post(handlers::post_entry))
        .route("/api/entries/:id", delete(handlers::remove_entry))
        .route("/api/emotions", get(handlers::get_emotions).post(handlers::post_emotion))
        .route("/api/emotions/:name", delete(handlers::delete_emotion))
        .route("/api/tags", get(handlers::get_tags).post(handlers::post_tag))
        .route("/api/tags/:name", delete(handlers::delete_tag))
        .route("/api/selection", get(handlers::get_selection).post(handlers::post_selection))
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::stage_import).delete(handlers::discard_import))
        .route("/api/import/confirm", post(handlers::confirm_import))
        .with_state(state)
}
