use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Voice platform events
        .route("/webhook", post(handlers::webhook))
        // Session scheduling and queries
        .route("/sessions", post(handlers::schedule_session))
        .route("/sessions/:call_id", get(handlers::get_session_status))
        .route(
            "/sessions/:call_id/transcript",
            get(handlers::get_session_transcript),
        )
        .route(
            "/sessions/:call_id/analysis",
            get(handlers::get_session_analysis),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
