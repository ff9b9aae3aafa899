use axum::{Json, extract::State, http::StatusCode};
use sea_orm::SqlErr;
use util::state::AppState;
use validator::Validate;

use super::common::{CreateStudentReq, StudentResponse};
use crate::response::ApiResponse;
use db::models::student;

/// POST /api/students
///
/// **Auth**: Admin.
pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<CreateStudentReq>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid student: {e}"))),
        );
    }

    let db = state.db();
    match student::Model::create(db, &body.student_id, &body.name, &body.email, &body.password)
        .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(StudentResponse::from(row), "Student created")),
        ),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Student number or email already exists")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create student: {e}"))),
            ),
        },
    }
}
