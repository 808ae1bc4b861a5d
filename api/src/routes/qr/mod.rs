use axum::{
    Router,
    routing::{get, post, put},
};
use util::state::AppState;

mod common;
mod get;
mod post;
mod put;

pub use common::SessionResponse;
pub use get::{get_session_token, list_sessions};
pub use post::create_session;
pub use put::stop_qr_session;

pub fn qr_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/", get(list_sessions))
        .route("/{session_id}/token", get(get_session_token))
        .route("/{session_id}/stop", put(stop_qr_session))
}
