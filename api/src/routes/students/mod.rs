use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

mod common;
mod delete;
mod get;
mod post;
mod put;

pub use common::StudentResponse;
pub use delete::delete_student;
pub use get::{get_student, get_student_stats, list_students};
pub use post::create_student;
pub use put::update_student;

pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/", post(create_student))
        .route("/{student_id}", get(get_student))
        .route("/{student_id}", put(update_student))
        .route("/{student_id}", delete(delete_student))
        .route("/{student_id}/stats", get(get_student_stats))
}
