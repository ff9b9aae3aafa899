use axum::{Json, extract::State, http::StatusCode};
use sea_orm::SqlErr;
use util::state::AppState;
use validator::Validate;

use super::common::{CourseResponse, CreateCourseReq};
use crate::response::ApiResponse;
use db::models::course;

/// POST /api/courses
///
/// **Auth**: Admin.
pub async fn create_course(
    State(state): State<AppState>,
    Json(body): Json<CreateCourseReq>,
) -> (StatusCode, Json<ApiResponse<CourseResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid course: {e}"))),
        );
    }

    let db = state.db();
    match course::Model::create(db, &body.course_code, &body.course_name).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(CourseResponse::from(row), "Course created")),
        ),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Course code already exists")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create course: {e}"))),
            ),
        },
    }
}
