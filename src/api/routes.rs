//! API Routes
//!
//! Configures the Axum router with the task API endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, tasks_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/health`, `GET /health` - Health check endpoint
/// - `GET /api/tasks`, `GET /tasks` - Task list
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/health", get(health_handler))
        .route("/api/tasks", get(tasks_handler))
        .route("/tasks", get(tasks_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
