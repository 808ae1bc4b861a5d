use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use super::common::RecordResponse;
use crate::response::ApiResponse;
use db::models::attendance_record::{Column as RecordCol, Entity as RecordEntity};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub section_id: Option<i64>,
    pub student_id: Option<i64>,
    pub subject: Option<String>,
    pub date: Option<NaiveDate>,
    pub draft: Option<bool>,
}

/// GET /api/attendance
///
/// Attendance history filtered by any combination of section, student,
/// subject, date and draft state.
pub async fn list_records(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<RecordResponse>>>) {
    let mut sel = RecordEntity::find()
        .order_by_desc(RecordCol::Date)
        .order_by_asc(RecordCol::StudentId);

    if let Some(section_id) = q.section_id {
        sel = sel.filter(RecordCol::SectionId.eq(section_id));
    }
    if let Some(student_id) = q.student_id {
        sel = sel.filter(RecordCol::StudentId.eq(student_id));
    }
    if let Some(subject) = q.subject.as_ref().filter(|s| !s.trim().is_empty()) {
        sel = sel.filter(RecordCol::Subject.eq(subject.trim()));
    }
    if let Some(date) = q.date {
        sel = sel.filter(RecordCol::Date.eq(date));
    }
    if let Some(draft) = q.draft {
        sel = sel.filter(RecordCol::Draft.eq(draft));
    }

    match sel.all(state.db()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(RecordResponse::from).collect::<Vec<_>>(),
                "Attendance records retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
