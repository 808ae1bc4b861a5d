use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;

use super::common::SessionResponse;
use crate::response::ApiResponse;
use crate::routes::common::rotation_policy;
use db::models::qr_session::{Column as SessionCol, Entity as SessionEntity};
use services::checkin;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct TokenResponse {
    pub session_id: i64,
    pub code: String,
    pub token: String,
    pub rotated: bool,
}

/// GET /api/qr
pub async fn list_sessions(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SessionResponse>>>) {
    match SessionEntity::find()
        .order_by_desc(SessionCol::CreatedAt)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(SessionResponse::from).collect::<Vec<_>>(),
                "Sessions retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /api/qr/{session_id}/token
///
/// The QR display polls this; each poll of an active session rotates the
/// token once it is stale.
pub async fn get_session_token(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<TokenResponse>>) {
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

    if !session.active {
        return (
            StatusCode::GONE,
            Json(ApiResponse::error("Session has been stopped")),
        );
    }

    match checkin::get_or_rotate_token(db, session, rotation_policy()).await {
        Ok(view) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TokenResponse {
                    session_id: view.session_id,
                    code: view.code,
                    token: view.current_token,
                    rotated: view.rotated,
                },
                "Token retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to rotate token: {e}"))),
        ),
    }
}
