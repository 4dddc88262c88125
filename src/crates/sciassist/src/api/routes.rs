//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{handlers, middleware::logging_layer};
use crate::dispatcher::Dispatcher;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the form router
pub fn create_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(handlers::form_page))
        .route("/health", get(handlers::health))
        .route("/api/v1/query", post(handlers::query))
        .route("/api/v1/debug", post(handlers::debug))
        .route("/api/v1/visualize", post(handlers::visualize))
        .layer(logging_layer())
        .with_state(AppState { dispatcher })
}
