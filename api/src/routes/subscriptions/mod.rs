use axum::{Router, routing::post};
use util::state::AppState;

mod post;

pub use post::subscribe;

pub fn subscriptions_routes() -> Router<AppState> {
    Router::new().route("/", post(subscribe))
}
