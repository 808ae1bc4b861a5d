use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::timetable_slot::{
    ActiveModel as SlotActive, Column as SlotCol, Entity as SlotEntity, Model as Slot,
};
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct SlotResponse {
    pub id: i64,
    pub section_id: i64,
    pub subject: String,
    pub teacher_id: i64,
    pub weekday: i16,
    pub period: i16,
}

impl From<Slot> for SlotResponse {
    fn from(m: Slot) -> Self {
        Self {
            id: m.id,
            section_id: m.section_id,
            subject: m.subject,
            teacher_id: m.teacher_id,
            weekday: m.weekday,
            period: m.period,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSlotReq {
    #[validate(length(min = 1, message = "Subject must not be empty"))]
    pub subject: String,
    pub teacher_id: i64,
    #[validate(range(min = 0, max = 6, message = "Weekday must be 0-6"))]
    pub weekday: i16,
    #[validate(range(min = 1, max = 12, message = "Period must be 1-12"))]
    pub period: i16,
}

#[derive(Debug, Deserialize)]
pub struct EditSlotReq {
    pub subject: Option<String>,
    pub teacher_id: Option<i64>,
    pub weekday: Option<i16>,
    pub period: Option<i16>,
}

/// GET /api/sections/{section_id}/timetable
pub async fn list_slots(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<SlotResponse>>>) {
    match SlotEntity::find()
        .filter(SlotCol::SectionId.eq(section_id))
        .order_by_asc(SlotCol::Weekday)
        .order_by_asc(SlotCol::Period)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(SlotResponse::from).collect(),
                "Timetable retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// POST /api/sections/{section_id}/timetable
pub async fn create_slot(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(req): Json<CreateSlotReq>,
) -> (StatusCode, Json<ApiResponse<SlotResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&errors))),
        );
    }

    let now = Utc::now();
    let slot = SlotActive {
        section_id: Set(section_id),
        subject: Set(req.subject.trim().to_owned()),
        teacher_id: Set(req.teacher_id),
        weekday: Set(req.weekday),
        period: Set(req.period),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match slot.insert(state.db()).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(SlotResponse::from(row), "Slot created")),
        ),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error(
                        "This section already has a lesson in that period",
                    )),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to create slot: {e}"))),
                )
            }
        }
    }
}

/// PUT /api/sections/{section_id}/timetable/{slot_id}
pub async fn update_slot(
    State(state): State<AppState>,
    Path((section_id, slot_id)): Path<(i64, i64)>,
    Json(req): Json<EditSlotReq>,
) -> (StatusCode, Json<ApiResponse<SlotResponse>>) {
    let db = state.db();

    let Some(slot) = SlotEntity::find()
        .filter(SlotCol::Id.eq(slot_id))
        .filter(SlotCol::SectionId.eq(section_id))
        .one(db)
        .await
        .ok()
        .flatten()
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Timetable slot not found")),
        );
    };

    let mut active = slot.into_active_model();
    if let Some(subject) = req.subject {
        active.subject = Set(subject.trim().to_owned());
    }
    if let Some(teacher_id) = req.teacher_id {
        active.teacher_id = Set(teacher_id);
    }
    if let Some(weekday) = req.weekday {
        active.weekday = Set(weekday);
    }
    if let Some(period) = req.period {
        active.period = Set(period);
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(row) => (
            StatusCode::OK,
            Json(ApiResponse::success(SlotResponse::from(row), "Slot updated")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update slot: {e}"))),
        ),
    }
}

/// DELETE /api/sections/{section_id}/timetable/{slot_id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path((section_id, slot_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match SlotEntity::delete_many()
        .filter(SlotCol::Id.eq(slot_id))
        .filter(SlotCol::SectionId.eq(section_id))
        .exec(db)
        .await
    {
        Ok(res) if res.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Slot deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Timetable slot not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete slot: {e}"))),
        ),
    }
}
