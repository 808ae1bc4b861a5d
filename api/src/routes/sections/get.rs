use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use serde::Serialize;

use crate::response::ApiResponse;
use db::models::section::{Column as SectionCol, Entity as SectionEntity, Model as Section};
use db::models::student::{Column as StudentCol, Entity as StudentEntity};
use sea_orm::{ColumnTrait, QueryFilter};
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct SectionResponse {
    pub id: i64,
    pub name: String,
    pub student_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl SectionResponse {
    pub fn from_with_count(m: Section, student_count: i64) -> Self {
        Self {
            id: m.id,
            name: m.name,
            student_count,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/sections
pub async fn list_sections(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SectionResponse>>>) {
    let db = state.db();

    let rows = match SectionEntity::find()
        .order_by_asc(SectionCol::Name)
        .all(db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let count = StudentEntity::find()
            .filter(StudentCol::SectionId.eq(row.id))
            .count(db)
            .await
            .unwrap_or(0) as i64;
        out.push(SectionResponse::from_with_count(row, count));
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(out, "Sections retrieved")),
    )
}

/// GET /api/sections/{section_id}
pub async fn get_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<SectionResponse>>) {
    let db = state.db();

    match SectionEntity::find_by_id(section_id).one(db).await {
        Ok(Some(row)) => {
            let count = StudentEntity::find()
                .filter(StudentCol::SectionId.eq(row.id))
                .count(db)
                .await
                .unwrap_or(0) as i64;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    SectionResponse::from_with_count(row, count),
                    "Section retrieved",
                )),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Section not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
