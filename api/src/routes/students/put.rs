use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;

use super::common::StudentResponse;
use crate::response::ApiResponse;
use db::models::student::Entity as StudentEntity;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditStudentReq {
    pub name: Option<String>,
    pub email: Option<String>,
    pub section_id: Option<i64>,
}

/// PUT /api/students/{student_id}
///
/// Roll numbers are immutable; a mistyped roll number means delete and
/// re-create.
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(req): Json<EditStudentReq>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    let db = state.db();

    let Some(student) = StudentEntity::find_by_id(student_id)
        .one(db)
        .await
        .ok()
        .flatten()
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        );
    };

    let mut active = student.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name.trim().to_owned());
    }
    if let Some(email) = req.email {
        let email = email.trim();
        active.email = Set(if email.is_empty() {
            None
        } else {
            Some(email.to_owned())
        });
    }
    if let Some(section_id) = req.section_id {
        active.section_id = Set(section_id);
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(row) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                StudentResponse::from(row),
                "Student updated",
            )),
        ),
        Err(e) if e.to_string().contains("FOREIGN KEY") => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Section does not exist")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update student: {e}"))),
        ),
    }
}
