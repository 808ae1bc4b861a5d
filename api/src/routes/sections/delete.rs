use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;

use crate::response::ApiResponse;
use db::models::section::Entity as SectionEntity;
use util::state::AppState;

/// DELETE /api/sections/{section_id}
///
/// Cascades to students, timetable slots and attendance history.
pub async fn delete_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    match SectionEntity::delete_by_id(section_id).exec(state.db()).await {
        Ok(res) if res.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Section deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Section not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete section: {e}"))),
        ),
    }
}
