use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use super::common::StudentResponse;
use crate::response::ApiResponse;
use db::models::student::{Column as StudentCol, Entity as StudentEntity};
use db::models::subject_stat::{
    Column as StatCol, Entity as StatEntity, Model as SubjectStat,
};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub section_id: Option<i64>,
    pub q: Option<String>, // search in name/roll number
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse {
    pub students: Vec<StudentResponse>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}

#[derive(Debug, Serialize, Default)]
pub struct SubjectStatResponse {
    pub subject: String,
    pub present_count: i64,
    pub late_count: i64,
    pub absent_count: i64,
    pub total_sessions: i64,
    pub percentage: i64,
}

impl From<SubjectStat> for SubjectStatResponse {
    fn from(m: SubjectStat) -> Self {
        Self {
            subject: m.subject,
            present_count: m.present_count,
            late_count: m.late_count,
            absent_count: m.absent_count,
            total_sessions: m.total_sessions,
            percentage: m.percentage,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct StudentStatsResponse {
    pub student_id: i64,
    pub roll_no: String,
    pub name: String,
    pub overall_percentage: i64,
    pub subjects: Vec<SubjectStatResponse>,
}

/// GET /api/students
///
/// Paginated roster listing, optionally scoped to a section.
pub async fn list_students(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<ListResponse>>) {
    let db = state.db();
    let page = q.page.unwrap_or(1).max(1) as u64;
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100) as u64;

    let mut sel = StudentEntity::find().order_by_asc(StudentCol::RollNo);
    if let Some(section_id) = q.section_id {
        sel = sel.filter(StudentCol::SectionId.eq(section_id));
    }
    if let Some(s) = q.q.as_ref().filter(|s| !s.trim().is_empty()) {
        sel = sel.filter(
            sea_orm::Condition::any()
                .add(StudentCol::Name.contains(s))
                .add(StudentCol::RollNo.contains(s)),
        );
    }

    let paginator = sel.paginate(db, per_page);
    let total = paginator.num_items().await.unwrap_or(0) as i32;
    let rows = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .unwrap_or_default();

    let resp = ListResponse {
        students: rows.into_iter().map(StudentResponse::from).collect(),
        page: page as i32,
        per_page: per_page as i32,
        total,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Students retrieved")),
    )
}

/// GET /api/students/{student_id}
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    match StudentEntity::find_by_id(student_id).one(state.db()).await {
        Ok(Some(s)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                StudentResponse::from(s),
                "Student retrieved",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /api/students/{student_id}/stats
///
/// Per-subject attendance aggregates plus the stored overall percentage.
pub async fn get_student_stats(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<StudentStatsResponse>>) {
    let db = state.db();

    let student = match StudentEntity::find_by_id(student_id).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let stats = match StatEntity::find()
        .filter(StatCol::StudentId.eq(student_id))
        .order_by_asc(StatCol::Subject)
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

    let resp = StudentStatsResponse {
        student_id: student.id,
        roll_no: student.roll_no,
        name: student.name,
        overall_percentage: student.overall_percentage,
        subjects: stats.into_iter().map(SubjectStatResponse::from).collect(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Student stats retrieved")),
    )
}
