use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod common;
mod get;
mod post;

pub use get::list_records;
pub use post::{finalize_attendance, submit_attendance};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_attendance))
        .route("/", get(list_records))
        .route("/finalize", post(finalize_attendance))
}
