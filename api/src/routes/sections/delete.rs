use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{section, section_student};

/// DELETE /api/sections/{section_id}
///
/// **Auth**: Admin.
pub async fn delete_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match section::Entity::delete_by_id(section_id).exec(db).await {
        Ok(dr) if dr.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Section deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Section not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete section: {e}"))),
        ),
    }
}

/// DELETE /api/sections/{section_id}/students/{student_id}
///
/// Removes the enrollment edge.
///
/// **Auth**: Admin.
pub async fn unenroll_student(
    State(state): State<AppState>,
    Path((section_id, student_id)): Path<(i64, String)>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match section_student::Model::unenroll(db, section_id, &student_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student removed from section")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student is not enrolled in this section")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to remove student: {e}"))),
        ),
    }
}
