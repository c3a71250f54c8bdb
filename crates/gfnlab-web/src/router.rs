//! Axum router — maps all URL paths to handlers.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::experiments::{
    experiment_list, experiment_page, experiment_submit, slash_redirect,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.static_dir);
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",         get(experiment_list))
        .route("/{slug}/",  get(experiment_page).post(experiment_submit))
        .route("/{slug}",   get(slash_redirect))

        // Static files
        .nest_service("/static", static_dir)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
