use crate::response::ApiResponse;
use axum::{Json, Router, http::StatusCode, routing::get};
use util::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /api/health
///
/// Liveness probe; always answers 200 while the process is up.
async fn health() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::OK, Json(ApiResponse::success((), "ok")))
}
