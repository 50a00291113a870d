//! HTTP API server

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::ThoughtService;

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{Endpoint, RouteTable};
pub use state::AppState;

/// Default cap on request bodies
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

/// Build the API router around the given service
pub fn create_router(service: Arc<ThoughtService>, body_limit: usize) -> Router {
    let (routes, endpoints) = RouteTable::new(&["cors", "json"])
        .route("/", &[Method::GET], get(handlers::root))
        .route("/health", &[Method::GET], get(handlers::health))
        .route(
            "/thoughts",
            &[Method::GET, Method::POST],
            get(handlers::list_thoughts).post(handlers::create_thought),
        )
        .route(
            "/thoughts/:id/like",
            &[Method::POST],
            post(handlers::like_thought),
        )
        .finish();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(service, endpoints))
}

/// Convenience helper using the default body limit
pub fn create_default_router(service: Arc<ThoughtService>) -> Router {
    create_router(service, DEFAULT_BODY_LIMIT)
}
