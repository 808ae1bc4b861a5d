use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use db::models::user;
use sea_orm::EntityTrait;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
}

/// GET /api/auth/me
///
/// Returns the account behind the presented bearer token. `/auth` is mounted
/// without a guard so login stays public; the extractor itself rejects
/// unauthenticated callers here.
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> (StatusCode, Json<ApiResponse<MeResponse>>) {
    match user::Entity::find_by_id(claims.sub).one(state.db()).await {
        Ok(Some(u)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                MeResponse {
                    id: u.id,
                    username: u.username,
                    email: u.email,
                    admin: u.admin,
                },
                "Current user",
            )),
        ),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Account no longer exists")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
