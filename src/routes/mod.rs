// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::snapshot::HealthService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) health: Arc<HealthService>,
    pub(crate) web_root: String,
}

pub fn app(health: Arc<HealthService>, web_root: String) -> Router {
    let state = AppState { health, web_root };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/health", get(http::api_health_handler)) // GET /api/health
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
