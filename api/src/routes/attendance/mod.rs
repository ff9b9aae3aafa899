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

pub use delete::invalidate_token;
pub use get::{get_token, section_records, session_records, student_history};
pub use post::{issue_token, record_scan};
pub use put::set_presence;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(issue_token))
        .route("/tokens/{token_id}", get(get_token))
        .route("/tokens/{token_id}", delete(invalidate_token))
        .route("/scans", post(record_scan))
        .route("/sections/{section_id}/records", get(section_records))
        .route("/sections/{section_id}/records", put(set_presence))
        .route("/sessions/{session_id}/records", get(session_records))
        .route("/students/{student_id}/history", get(student_history))
}
