// GET handlers: dashboard page, version, health snapshot

use axum::{extract::State, http::StatusCode, response::Html, response::IntoResponse};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET / — serves the dashboard page from {web_root}/index.html.
pub(super) async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let path = std::path::Path::new(&state.web_root).join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "dashboard page unavailable");
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        }
    }
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/health — assembles and returns one fresh snapshot. Degraded
/// sources render as zeros or empty arrays, never as an HTTP error.
pub(super) async fn api_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.health.collect_snapshot().await)
}
