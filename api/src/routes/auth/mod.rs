use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod common;
mod get;
mod post;

pub use get::verify;
pub use post::login;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/verify", get(verify))
}
