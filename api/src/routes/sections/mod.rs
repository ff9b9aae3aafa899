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

pub use delete::{delete_section, unenroll_student};
pub use get::{get_section, list_section_students, list_sections};
pub use post::{create_section, enroll_student};
pub use put::edit_section;

pub fn sections_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections))
        .route("/", post(create_section))
        .route("/{section_id}", get(get_section))
        .route("/{section_id}", put(edit_section))
        .route("/{section_id}", delete(delete_section))
        .route("/{section_id}/students", get(list_section_students))
        .route("/{section_id}/students", post(enroll_student))
        .route("/{section_id}/students/{student_id}", delete(unenroll_student))
}
