use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, QueryOrder};
use util::state::AppState;

use super::common::StudentResponse;
use crate::response::ApiResponse;
use db::models::student;

/// GET /api/students
///
/// **Auth**: Admin.
pub async fn list_students(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<StudentResponse>>>) {
    let db = state.db();

    match student::Entity::find()
        .order_by_asc(student::Column::StudentId)
        .all(db)
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(StudentResponse::from).collect(),
                "Students retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve students: {e}"))),
        ),
    }
}

/// GET /api/students/{student_id}
///
/// **Auth**: Admin.
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    let db = state.db();

    match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(row)) => (
            StatusCode::OK,
            Json(ApiResponse::success(StudentResponse::from(row), "Student retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve student: {e}"))),
        ),
    }
}
