//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → login and current-user endpoints (public login, authed `me`)
//! - `/users` → staff account management (admin-only)
//! - `/sections` → section and timetable management (authenticated)
//! - `/students` → student roster and stats (authenticated)
//! - `/attendance` → batch marking, finalize, listing (authenticated)
//! - `/qr` → QR session management (authenticated)
//! - `/checkin` → public self-check-in surface (no authentication)

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::routes::{
    attendance::attendance_routes, auth::auth_routes, checkin::checkin_routes,
    health::health_routes, qr::qr_routes, sections::sections_routes, students::students_routes,
    users::users_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod checkin;
pub mod common;
pub mod health;
pub mod qr;
pub mod sections;
pub mod students;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
///
/// All core API routes are mounted under their respective base paths with
/// `app_state` already supplied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/sections",
            sections_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/students",
            students_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/qr", qr_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/checkin", checkin_routes())
        .with_state(app_state)
}
