use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// Create the main application router with all API endpoints
pub fn create_router(state: AppState) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Current analysis
        .route(
            "/api/results",
            post(handlers::load_result)
                .get(handlers::get_result)
                .delete(handlers::clear_result),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/alerts", get(handlers::get_alerts))
        .route("/api/charts", get(handlers::get_charts))
        // Assistant
        .route("/api/chat", get(handlers::get_chat).post(handlers::ask))
        // Doubts
        .route(
            "/api/doubts",
            get(handlers::list_doubts).post(handlers::add_doubt),
        )
        .route("/api/doubts/:id", delete(handlers::remove_doubt))
        .route("/api/doubts/:id/toggle", post(handlers::toggle_doubt))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
