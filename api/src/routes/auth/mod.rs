use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::me;
pub use post::login;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}
