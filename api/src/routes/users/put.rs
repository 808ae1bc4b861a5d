use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;

use super::common::UserResponse;
use crate::response::ApiResponse;
use db::models::user::Entity as UserEntity;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditUserReq {
    pub email: Option<String>,
    pub admin: Option<bool>,
}

/// PUT /api/users/{user_id}
///
/// Edits email and/or admin flag. Password changes go through a dedicated
/// flow, not this endpoint.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<EditUserReq>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    let db = state.db();

    let Some(user) = UserEntity::find_by_id(user_id).one(db).await.ok().flatten() else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        );
    };

    let mut active = user.into_active_model();
    if let Some(email) = req.email {
        active.email = Set(email);
    }
    if let Some(admin) = req.admin {
        active.admin = Set(admin);
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(u) => (
            StatusCode::OK,
            Json(ApiResponse::success(UserResponse::from(u), "User updated")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update user: {e}"))),
        ),
    }
}
