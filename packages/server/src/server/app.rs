//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::auth::JwtService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    cancel_handler, conversation_summary_handler, create_request_handler, get_match_handler,
    get_request_handler, health_handler, match_conversation_handler, match_stats_handler,
    rate_match_handler, request_stats_handler, respond_handler, update_match_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, jwt_service: Arc<JwtService>) -> Router {
    let app_state = AppState {
        deps,
        jwt_service: jwt_service.clone(),
    };

    Router::new()
        .route("/rooms/:room_id/requests", post(create_request_handler))
        .route("/requests/stats", get(request_stats_handler))
        .route("/requests/:id", get(get_request_handler))
        .route("/requests/:id/respond", post(respond_handler))
        .route("/requests/:id/cancel", post(cancel_handler))
        .route("/matches/stats", get(match_stats_handler))
        .route(
            "/matches/:id",
            get(get_match_handler).patch(update_match_handler),
        )
        .route("/matches/:id/rate", post(rate_match_handler))
        .route("/matches/:id/conversation", get(match_conversation_handler))
        .route("/conversations/:id", get(conversation_summary_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
