//! Bookshelf library catalogue
//!
//! Tracks books and users, lends books out and takes them back, persists
//! everything as JSON documents and serves it through a REST JSON API.

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod ids;
pub mod library;
pub mod models;
pub mod pagination;
pub mod services;
pub mod storage;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers.
///
/// Every request works on the services under one lock, so catalogue
/// operations never interleave.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Mutex<services::Services>>,
}

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(Mutex::new(services)),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api::routes(state))
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
