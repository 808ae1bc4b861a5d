//! Public self-check-in surface. No authentication; callers prove themselves
//! with the session code plus the short-lived token from the QR display.

use axum::{
    Json,
    Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::response::ApiResponse;
use crate::routes::common::{rotation_policy, scoring_policy};
use services::checkin::{self, CheckInError, CheckInRequest};
use util::state::AppState;

pub fn checkin_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(checkin_status))
        .route("/", post(check_in))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct StatusResponse {
    pub session_id: i64,
    pub code: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckInReq {
    pub code: String,
    pub token: String,
    pub roll_no: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Default)]
pub struct CheckInResponse {
    pub student_name: String,
    pub already_marked: bool,
}

/// GET /api/checkin/status?code=...
///
/// Polled by the QR display; every poll of an active session may rotate the
/// token. Omitting the code falls back to the most recent active session.
pub async fn checkin_status(
    State(state): State<AppState>,
    Query(q): Query<StatusQuery>,
) -> (StatusCode, Json<ApiResponse<StatusResponse>>) {
    let code = q.code.as_deref().map(str::trim).filter(|s| !s.is_empty());

    match checkin::session_status(state.db(), code, rotation_policy()).await {
        Ok(Some(view)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                StatusResponse {
                    session_id: view.session_id,
                    code: view.code,
                    token: view.current_token,
                },
                "Session active",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("No active check-in session")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// POST /api/checkin
///
/// Redeems one scan. Repeat scans for a student already marked today still
/// return success with `already_marked` set.
pub async fn check_in(
    State(state): State<AppState>,
    Json(req): Json<CheckInReq>,
) -> (StatusCode, Json<ApiResponse<CheckInResponse>>) {
    let coords = match (req.latitude, req.longitude) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };

    let attempt = CheckInRequest {
        code: req.code.trim(),
        token: req.token.trim(),
        roll_no: req.roll_no.trim(),
        coords,
    };

    match checkin::redeem_check_in(state.db(), attempt, scoring_policy()).await {
        Ok(outcome) => {
            info!(
                roll_no = %attempt.roll_no,
                already_marked = outcome.already_marked,
                "check-in accepted"
            );
            let message = if outcome.already_marked {
                "Already checked in for this session"
            } else {
                "Checked in"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    CheckInResponse {
                        student_name: outcome.student_name,
                        already_marked: outcome.already_marked,
                    },
                    message,
                )),
            )
        }
        Err(e) => {
            let status = match &e {
                CheckInError::InvalidSession => StatusCode::NOT_FOUND,
                CheckInError::InvalidToken => StatusCode::UNAUTHORIZED,
                CheckInError::NotAllowed => StatusCode::FORBIDDEN,
                CheckInError::StudentNotFound => StatusCode::NOT_FOUND,
                CheckInError::OutOfRange => StatusCode::UNPROCESSABLE_ENTITY,
                CheckInError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ApiResponse::error(e.to_string())))
        }
    }
}
