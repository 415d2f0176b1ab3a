pub mod api;
pub mod config;
pub mod pages;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health))
        .route("/status", get(api::status));

    Router::new()
        .route("/", get(pages::index))
        .route("/set-slot", post(pages::set_slot))
        .route("/reset-gain", post(pages::reset_gain))
        .route("/set-filter-state", post(pages::set_filter_state))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
