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

pub use delete::delete_lecturer;
pub use get::{get_lecturer, list_lecturers};
pub use post::create_lecturer;
pub use put::edit_lecturer;

pub fn lecturers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lecturers))
        .route("/", post(create_lecturer))
        .route("/{lecturer_id}", get(get_lecturer))
        .route("/{lecturer_id}", put(edit_lecturer))
        .route("/{lecturer_id}", delete(delete_lecturer))
}
