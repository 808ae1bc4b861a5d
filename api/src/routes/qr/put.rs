use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;

use super::common::SessionResponse;
use crate::response::ApiResponse;
use db::models::qr_session::Entity as SessionEntity;
use services::checkin;
use util::state::AppState;

/// PUT /api/qr/{session_id}/stop
///
/// Terminal; a stopped session rejects every later check-in.
pub async fn stop_qr_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = state.db();

    let session = match SessionEntity::find_by_id(session_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Session not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    match checkin::stop_session(db, session).await {
        Ok(stopped) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionResponse::from(stopped),
                "Session stopped",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to stop session: {e}"))),
        ),
    }
}
