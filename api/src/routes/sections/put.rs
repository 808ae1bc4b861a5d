use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, Set,
};
use serde::Deserialize;

use super::get::SectionResponse;
use crate::response::ApiResponse;
use db::models::section::Entity as SectionEntity;
use db::models::student::{Column as StudentCol, Entity as StudentEntity};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditSectionReq {
    pub name: String,
}

/// PUT /api/sections/{section_id}
pub async fn update_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(req): Json<EditSectionReq>,
) -> (StatusCode, Json<ApiResponse<SectionResponse>>) {
    let db = state.db();

    let Some(section) = SectionEntity::find_by_id(section_id)
        .one(db)
        .await
        .ok()
        .flatten()
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Section not found")),
        );
    };

    let mut active = section.into_active_model();
    active.name = Set(req.name.trim().to_owned());
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(row) => {
            let count = StudentEntity::find()
                .filter(StudentCol::SectionId.eq(row.id))
                .count(db)
                .await
                .unwrap_or(0) as i64;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    SectionResponse::from_with_count(row, count),
                    "Section updated",
                )),
            )
        }
        Err(e) if e.to_string().contains("UNIQUE") => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("A section with this name already exists")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update section: {e}"))),
        ),
    }
}
