use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use validator::Validate;

use super::get::SectionResponse;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::section::Model as SectionModel;
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSectionReq {
    #[validate(length(min = 1, message = "Section name must not be empty"))]
    pub name: String,
}

/// POST /api/sections
pub async fn create_section(
    State(state): State<AppState>,
    Json(req): Json<CreateSectionReq>,
) -> (StatusCode, Json<ApiResponse<SectionResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    match SectionModel::create(state.db(), req.name.trim()).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SectionResponse::from_with_count(row, 0),
                "Section created",
            )),
        ),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error("A section with this name already exists")),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to create section: {e}"))),
                )
            }
        }
    }
}
