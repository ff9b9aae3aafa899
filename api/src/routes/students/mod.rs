use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod common;
mod delete;
mod get;
mod post;
mod put;

pub use delete::delete_student;
pub use get::{get_student, list_students};
pub use post::create_student;
pub use put::edit_student;

pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/", post(create_student))
        .route("/{student_id}", get(get_student))
        .route("/{student_id}", put(edit_student))
        .route("/{student_id}", delete(delete_student))
}
