use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use validator::Validate;

use super::common::StudentResponse;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::student::Model as StudentModel;
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentReq {
    #[validate(length(min = 1, message = "Roll number must not be empty"))]
    pub roll_no: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub section_id: i64,
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentReq>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    match StudentModel::create(
        state.db(),
        req.roll_no.trim(),
        req.name.trim(),
        req.email.as_deref(),
        req.section_id,
    )
    .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                StudentResponse::from(row),
                "Student created",
            )),
        ),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "A student with this roll number already exists",
                    )),
                )
            } else if msg.contains("FOREIGN KEY") {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("Section does not exist")),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to create student: {e}"))),
                )
            }
        }
    }
}
