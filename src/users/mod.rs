use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/", put(handlers::update_user))
        .route(
            "/:key",
            get(handlers::find_user).delete(handlers::delete_user),
        )
}
