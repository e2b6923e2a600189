//! pollme HTTP gateway.
//!
//! Serves the reflected model schema as JSON and HTML pages, and the polls
//! JSON API.

pub mod config;
pub mod error;
pub mod html;
pub mod json;
pub mod routes;
pub mod user;

pub use config::{Args, GatewayConfig};
pub use error::AppError;
pub use user::{CurrentUser, USER_HEADER};

use std::sync::Arc;

use axum::Router;
use pollme_core::catalog::{AppConfig, AppRegistry};
use pollme_core::reader::ModelReader;
use pollme_polls::PollService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Installed apps and their models.
    pub registry: Arc<AppRegistry>,
    /// Poll operations.
    pub polls: Arc<PollService>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(registry: AppRegistry, polls: PollService, config: GatewayConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            polls: Arc::new(polls),
            config,
        }
    }

    /// A schema reader over a fresh snapshot of the registry.
    pub fn reader(&self) -> ModelReader<AppConfig> {
        ModelReader::from_registry(self.registry.as_ref(), self.config.reader_config())
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::reader::routes())
        .merge(routes::polls::routes())
        .merge(routes::hierarchy::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
