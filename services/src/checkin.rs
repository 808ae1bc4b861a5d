//! Rotating QR check-in protocol.
//!
//! A session owner publishes a stable public code; the QR display polls the
//! status endpoint, and each poll of an active session lazily rotates the
//! short-lived token once it is older than the rotation interval. The
//! previous token stays valid as a one-step grace buffer for clients that
//! scanned just before a rotation. No background timer exists anywhere; the
//! polling displays drive the clock.

use chrono::Utc;
use db::models::{
    attendance_record::{self, AttendanceStatus},
    qr_allow_list, qr_session, student,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, IntoActiveModel, Set};
use thiserror::Error;

use crate::scoring::{self, ScoringPolicy};

/// Token lifetime before a status check triggers rotation.
pub const TOKEN_ROTATION_INTERVAL_SECONDS: i64 = 30;

/// Radius applied when a session carries coordinates but no explicit radius.
pub const DEFAULT_GEOFENCE_RADIUS_METERS: f64 = 100.0;

/// Rotation policy knobs. `Default` uses [`TOKEN_ROTATION_INTERVAL_SECONDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub interval_seconds: i64,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            interval_seconds: TOKEN_ROTATION_INTERVAL_SECONDS,
        }
    }
}

/// Snapshot of a session's tokens as of one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenView {
    pub session_id: i64,
    pub code: String,
    pub current_token: String,
    pub previous_token: Option<String>,
    pub rotated: bool,
}

/// Everything a redemption attempt carries.
#[derive(Debug, Clone, Copy)]
pub struct CheckInRequest<'a> {
    pub code: &'a str,
    pub token: &'a str,
    pub roll_no: &'a str,
    /// Caller coordinates (latitude, longitude), required when the session
    /// has a geofence.
    pub coords: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub student_name: String,
    /// True when an identical mark already existed; repeat scans succeed
    /// without writing a duplicate.
    pub already_marked: bool,
}

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("No active check-in session for that code")]
    InvalidSession,
    #[error("That code has expired; rescan the QR and try again")]
    InvalidToken,
    #[error("You are not on the attendee list for this session")]
    NotAllowed,
    #[error("No student matches that roll number")]
    StudentNotFound,
    #[error("You are too far from the venue to check in")]
    OutOfRange,
    #[error("storage failure: {0}")]
    Storage(#[from] DbErr),
}

/// Returns the session's current tokens, rotating first when the stored token
/// has outlived the interval.
///
/// Rotation is read-then-write without a guard: two concurrent polls that
/// both observe staleness both rotate and the last write survives. The token
/// still rotates, so the race is benign and deliberately left unlocked.
pub async fn get_or_rotate_token(
    db: &DatabaseConnection,
    session: qr_session::Model,
    policy: RotationPolicy,
) -> Result<TokenView, DbErr> {
    let now = Utc::now();
    let elapsed = now.signed_duration_since(session.token_updated_at);

    if elapsed.num_seconds() <= policy.interval_seconds {
        return Ok(TokenView {
            session_id: session.id,
            code: session.code.clone(),
            current_token: session.rotating_token.clone(),
            previous_token: session.previous_token.clone(),
            rotated: false,
        });
    }

    let fresh = qr_session::generate_token(16);
    let grace = session.rotating_token.clone();
    let session_id = session.id;
    let code = session.code.clone();

    let mut active = session.into_active_model();
    active.previous_token = Set(Some(grace.clone()));
    active.rotating_token = Set(fresh.clone());
    active.token_updated_at = Set(now);
    active.update(db).await?;

    Ok(TokenView {
        session_id,
        code,
        current_token: fresh,
        previous_token: Some(grace),
        rotated: true,
    })
}

/// Status check by public code, with most-recently-created-active fallback
/// when the code is omitted. Drives lazy rotation.
pub async fn session_status(
    db: &DatabaseConnection,
    code: Option<&str>,
    policy: RotationPolicy,
) -> Result<Option<TokenView>, DbErr> {
    match qr_session::Model::find_active(db, code).await? {
        Some(session) => Ok(Some(get_or_rotate_token(db, session, policy).await?)),
        None => Ok(None),
    }
}

/// Redeems one scan: validates the session, token, allow-list and geofence,
/// then idempotently writes today's `present` mark and recomputes the
/// student's stats.
///
/// The token is checked before the allow-list so a caller holding a stale
/// token learns nothing about who may attend.
pub async fn redeem_check_in(
    db: &DatabaseConnection,
    req: CheckInRequest<'_>,
    scoring_policy: ScoringPolicy,
) -> Result<CheckInOutcome, CheckInError> {
    let session = qr_session::Model::find_active(db, Some(req.code))
        .await?
        .ok_or(CheckInError::InvalidSession)?;

    if !session.accepts_token(req.token.trim()) {
        return Err(CheckInError::InvalidToken);
    }

    if qr_allow_list::Model::is_restricted(db, session.id).await?
        && !qr_allow_list::Model::contains(db, session.id, req.roll_no).await?
    {
        return Err(CheckInError::NotAllowed);
    }

    if let (Some(lat), Some(lng)) = (session.latitude, session.longitude) {
        let (caller_lat, caller_lng) = req.coords.ok_or(CheckInError::OutOfRange)?;
        let radius = session.radius_m.unwrap_or(DEFAULT_GEOFENCE_RADIUS_METERS);
        if haversine_distance_m((lat, lng), (caller_lat, caller_lng)) > radius {
            return Err(CheckInError::OutOfRange);
        }
    }

    let student = student::Model::find_by_roll_no(db, req.roll_no)
        .await?
        .ok_or(CheckInError::StudentNotFound)?;

    let today = Utc::now().date_naive();

    if attendance_record::Model::find_existing(db, student.id, today, &session.subject, None)
        .await?
        .is_some()
    {
        return Ok(CheckInOutcome {
            student_name: student.name,
            already_marked: true,
        });
    }

    let section_id = session.section_id.unwrap_or(student.section_id);
    attendance_record::Model::upsert_mark(
        db,
        student.id,
        section_id,
        &session.subject,
        today,
        AttendanceStatus::Present,
        false,
        None,
        session.created_by,
    )
    .await?;

    // A non-draft record was just written, so the stats follow immediately.
    scoring::recalculate_stats(db, student.id, &session.subject, scoring_policy).await?;

    Ok(CheckInOutcome {
        student_name: student.name,
        already_marked: false,
    })
}

/// Stops a session; terminal, check-ins are rejected regardless of token.
pub async fn stop_session(
    db: &DatabaseConnection,
    session: qr_session::Model,
) -> Result<qr_session::Model, DbErr> {
    let mut active = session.into_active_model();
    active.active = Set(false);
    active.update(db).await
}

/// Great-circle distance between two (latitude, longitude) pairs, in meters.
pub fn haversine_distance_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let (lat1, lng1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lng2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
