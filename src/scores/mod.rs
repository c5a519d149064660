use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    // Static segments are registered alongside `/:id`; axum gives them
    // priority, matching the original route order.
    Router::new()
        .route("/add", post(handlers::add_score))
        .route("/user/:user_id", get(handlers::get_user_scores))
        .route("/leaderboard", get(handlers::get_leaderboard))
        .route("/", put(handlers::update_score))
        .route(
            "/:id",
            get(handlers::get_score).delete(handlers::delete_score),
        )
}
