use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

mod delete;
mod get;
mod post;
mod put;
mod timetable;

pub use delete::delete_section;
pub use get::{get_section, list_sections};
pub use post::create_section;
pub use put::update_section;

pub fn sections_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections))
        .route("/", post(create_section))
        .route("/{section_id}", get(get_section))
        .route("/{section_id}", put(update_section))
        .route("/{section_id}", delete(delete_section))
        .route("/{section_id}/timetable", get(timetable::list_slots))
        .route("/{section_id}/timetable", post(timetable::create_slot))
        .route(
            "/{section_id}/timetable/{slot_id}",
            put(timetable::update_slot),
        )
        .route(
            "/{section_id}/timetable/{slot_id}",
            delete(timetable::delete_slot),
        )
}
