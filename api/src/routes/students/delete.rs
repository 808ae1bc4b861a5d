use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;

use crate::response::ApiResponse;
use db::models::student::Entity as StudentEntity;
use util::state::AppState;

/// DELETE /api/students/{student_id}
///
/// Cascades to attendance records and subject stats.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    match StudentEntity::delete_by_id(student_id).exec(state.db()).await {
        Ok(res) if res.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete student: {e}"))),
        ),
    }
}
