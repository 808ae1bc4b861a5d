use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::error;

use super::common::SessionResponse;
use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use db::models::{qr_allow_list, qr_session};
use util::{config, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSessionReq {
    pub section_id: Option<i64>,
    pub subject: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<f64>,
    /// Roll numbers permitted to check in. Empty or absent means the session
    /// is open to every student.
    #[serde(default)]
    pub allow_list: Vec<String>,
}

/// POST /api/qr
///
/// Starts a check-in session. The response carries the public code for the
/// shareable link; the rotating token comes from the token endpoint.
pub async fn create_session(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateSessionReq>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = state.db();

    if req.subject.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Subject must not be empty")),
        );
    }
    if req.latitude.is_some() != req.longitude.is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "Latitude and longitude must be provided together",
            )),
        );
    }

    // Geofenced sessions get the configured radius when none was asked for.
    let radius_m = req
        .radius_m
        .or_else(|| {
            req.latitude
                .is_some()
                .then(config::default_geofence_radius_meters)
        });

    let session = match qr_session::Model::create(
        db,
        req.section_id,
        req.subject.trim(),
        Some(claims.sub),
        req.latitude,
        req.longitude,
        radius_m,
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            error!("failed to create qr session: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create session: {e}"))),
            );
        }
    };

    for roll_no in req
        .allow_list
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        if let Err(e) = qr_allow_list::Model::add(db, session.id, roll_no).await {
            error!("failed to add {roll_no} to allow list: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!(
                    "Failed to save allow list: {e}"
                ))),
            );
        }
    }

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            SessionResponse::from(session),
            "Check-in session started",
        )),
    )
}
