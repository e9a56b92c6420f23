//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Accounts
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        // Study chat
        .route("/chat", post(handlers::chat::chat))
        .route("/sessions", get(handlers::chat::list_sessions))
        .route(
            "/sessions/{id}/messages",
            get(handlers::chat::session_messages),
        )
        // Courses
        .route("/courses", get(handlers::course::list_courses))
        .route("/courses/my", get(handlers::course::my_courses))
        .route("/courses/{id}/buy", post(handlers::course::buy_course))
        .route(
            "/courses/{id}/content",
            get(handlers::course::course_content),
        )
        // Course management
        .route("/admin/courses", post(handlers::admin::create_course))
        .route(
            "/admin/courses/{id}/content",
            post(handlers::admin::add_content),
        )
        // Notes
        .route(
            "/notes",
            get(handlers::note::list_notes).post(handlers::note::create_note),
        )
        .route(
            "/notes/{id}",
            put(handlers::note::update_note).delete(handlers::note::delete_note),
        )
        // Owner dashboard
        .route("/analytics/dashboard", get(handlers::analytics::dashboard));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
