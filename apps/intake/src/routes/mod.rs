pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::intake::handlers;
use crate::intake::storage::UPLOADS_PREFIX;
use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the resume cap.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.policy.max_bytes.saturating_add(FORM_OVERHEAD_BYTES);
    let uploads = ServeDir::new(state.storage.root());

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/apply",
            post(handlers::handle_apply).layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest_service(&format!("/{UPLOADS_PREFIX}"), uploads)
        .with_state(state)
}
