use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::student;

/// DELETE /api/students/{student_id}
///
/// Deleting a student cascades to their enrollments and presence records.
///
/// **Auth**: Admin.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match student::Entity::delete_by_id(student_id).exec(db).await {
        Ok(dr) if dr.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete student: {e}"))),
        ),
    }
}
