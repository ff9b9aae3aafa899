pub mod attendance;

use axum::{Router, routing::get};
use util::state::AppState;

/// Builds the `/ws` route group.
pub fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sections/{section_id}", get(attendance::section_ws_handler))
        .with_state(app_state)
}
