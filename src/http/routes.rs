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
        // Session lifecycle
        .route("/session/start", post(handlers::start_session))
        .route("/session/stop", post(handlers::stop_session))
        .route("/session/reconnect", post(handlers::reconnect_session))
        // Track toggles
        .route("/session/video", post(handlers::set_video))
        .route("/session/audio", post(handlers::set_audio))
        // Read models
        .route("/session/status", get(handlers::session_status))
        .route("/session/warnings", get(handlers::session_warnings))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
