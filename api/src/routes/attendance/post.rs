use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::scoring_policy;
use db::models::attendance_record::{
    AttendanceStatus, Column as RecordCol, Entity as RecordEntity, Model as AttendanceRecord,
};
use services::scoring;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize)]
pub struct SubmitReq {
    pub section_id: i64,
    pub subject: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub draft: bool,
    pub slot_id: Option<i64>,
    pub entries: Vec<MarkEntry>,
}

#[derive(Debug, Serialize, Default)]
pub struct SubmitResponse {
    pub created: usize,
    pub updated: usize,
    pub draft: bool,
}

#[derive(Debug, Deserialize)]
pub struct FinalizeReq {
    pub section_id: i64,
    pub subject: String,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Default)]
pub struct FinalizeResponse {
    pub finalized: usize,
}

/// POST /api/attendance
///
/// Batch-marks a section for one subject and date. Re-submitting overwrites
/// prior marks for the same key; stats recompute only for non-draft writes.
pub async fn submit_attendance(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<SubmitReq>,
) -> (StatusCode, Json<ApiResponse<SubmitResponse>>) {
    let db = state.db();

    if req.subject.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Subject must not be empty")),
        );
    }
    if req.entries.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("At least one entry is required")),
        );
    }

    let subject = req.subject.trim();
    let policy = scoring_policy();
    let mut created = 0usize;
    let mut updated = 0usize;

    for entry in &req.entries {
        let res = AttendanceRecord::upsert_mark(
            db,
            entry.student_id,
            req.section_id,
            subject,
            req.date,
            entry.status,
            req.draft,
            req.slot_id,
            Some(claims.sub),
        )
        .await;

        let (record, was_created) = match res {
            Ok(pair) => pair,
            Err(e) => {
                error!("attendance upsert failed for student {}: {e}", entry.student_id);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!(
                        "Failed to save attendance: {e}"
                    ))),
                );
            }
        };
        if was_created {
            created += 1;
        } else {
            updated += 1;
        }

        // Draft marks stay invisible to stats; only committed rows recompute.
        if !record.draft {
            if let Err(e) =
                scoring::recalculate_stats(db, entry.student_id, subject, policy).await
            {
                error!("stat recompute failed for student {}: {e}", entry.student_id);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!(
                        "Failed to recompute stats: {e}"
                    ))),
                );
            }
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            SubmitResponse {
                created,
                updated,
                draft: req.draft,
            },
            "Attendance saved",
        )),
    )
}

/// POST /api/attendance/finalize
///
/// Commits every draft mark for (section, subject, date) and recomputes the
/// stats of each affected student.
pub async fn finalize_attendance(
    State(state): State<AppState>,
    Json(req): Json<FinalizeReq>,
) -> (StatusCode, Json<ApiResponse<FinalizeResponse>>) {
    let db = state.db();
    let subject = req.subject.trim();
    let policy = scoring_policy();

    let drafts = match RecordEntity::find()
        .filter(RecordCol::SectionId.eq(req.section_id))
        .filter(RecordCol::Subject.eq(subject))
        .filter(RecordCol::Date.eq(req.date))
        .filter(RecordCol::Draft.eq(true))
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

    let mut finalized = 0usize;
    for record in drafts {
        let student_id = record.student_id;
        let mut active = record.into_active_model();
        active.draft = Set(false);
        active.updated_at = Set(Utc::now());
        if let Err(e) = active.update(db).await {
            error!("finalize failed for student {student_id}: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to finalize: {e}"))),
            );
        }
        finalized += 1;

        if let Err(e) = scoring::recalculate_stats(db, student_id, subject, policy).await {
            error!("stat recompute failed for student {student_id}: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to recompute stats: {e}"))),
            );
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            FinalizeResponse { finalized },
            "Attendance finalized",
        )),
    )
}
