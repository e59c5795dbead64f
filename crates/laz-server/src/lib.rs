//! Laz API Server
//!
//! Backend for the Laz content site: per-item up/down voting keyed by a
//! hashed visitor address, and newsletter sign-ups.
//!
//! Uses SQLite (embedded) for all state.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod storage;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // REST API routes
        .nest("/api", api_routes())
        // Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/vote", post(handlers::votes::cast))
        .route("/votes/:slug", get(handlers::votes::get))
        .route("/subscribe", post(handlers::subscribers::subscribe))
        .route("/subscribers", get(handlers::subscribers::list))
}
