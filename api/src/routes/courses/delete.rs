use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::course;

/// DELETE /api/courses/{course_code}
///
/// Deleting a course cascades to its sections, tokens, and enrollment edges.
///
/// **Auth**: Admin.
pub async fn delete_course(
    State(state): State<AppState>,
    Path(course_code): Path<String>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    let res = course::Entity::delete_many()
        .filter(course::Column::CourseCode.eq(&course_code))
        .exec(db)
        .await;

    match res {
        Ok(dr) if dr.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Course deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Course not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete course: {e}"))),
        ),
    }
}
