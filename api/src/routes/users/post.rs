use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use validator::Validate;

use super::common::UserResponse;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::user::Model as UserModel;
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserReq {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub admin: Option<bool>,
}

/// POST /api/users
///
/// Creates a teacher or admin account.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserReq>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    match UserModel::create(
        state.db(),
        &req.username,
        &req.email,
        &req.password,
        req.admin.unwrap_or(false),
    )
    .await
    {
        Ok(u) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(UserResponse::from(u), "User created")),
        ),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A user with this username or email already exists",
                    )),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to create user: {e}"))),
                )
            }
        }
    }
}
