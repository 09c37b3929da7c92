pub mod health;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::submissions::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::liveness_handler))
        .route(
            "/api/submissions",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route("/api/submissions/:id", put(handlers::handle_update_reason))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
