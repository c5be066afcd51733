pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // The original web client posts without the trailing slash.
        .route("/upload/", post(handlers::handle_upload))
        .route("/upload", post(handlers::handle_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
