pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handlers::handle_catalog))
        .route(
            "/api/v1/notes/generate",
            post(handlers::handle_generate_note),
        )
        .route(
            "/api/v1/scholar/generate",
            post(handlers::handle_generate_scholar),
        )
        .route(
            "/api/v1/citations/format",
            post(handlers::handle_format_citations),
        )
        .route("/api/v1/llm/verify", post(handlers::handle_verify_llm))
        .with_state(state)
}
