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

pub use delete::delete_course;
pub use get::{get_course, list_courses};
pub use post::create_course;
pub use put::edit_course;

pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/", post(create_course))
        .route("/{course_code}", get(get_course))
        .route("/{course_code}", put(edit_course))
        .route("/{course_code}", delete(delete_course))
}
