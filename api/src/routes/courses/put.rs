use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use util::state::AppState;
use validator::Validate;

use super::common::{CourseResponse, EditCourseReq};
use crate::response::ApiResponse;
use db::models::course;

/// PUT /api/courses/{course_code}
///
/// **Auth**: Admin.
pub async fn edit_course(
    State(state): State<AppState>,
    Path(course_code): Path<String>,
    Json(body): Json<EditCourseReq>,
) -> (StatusCode, Json<ApiResponse<CourseResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid course: {e}"))),
        );
    }

    let db = state.db();
    let existing = match course::Model::find_by_code(db, &course_code).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Course not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to retrieve course: {e}"))),
            );
        }
    };

    let mut am: course::ActiveModel = existing.into();
    if let Some(name) = body.course_name {
        am.course_name = Set(name);
    }
    am.updated_at = Set(Utc::now());

    match am.update(db).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(CourseResponse::from(updated), "Course updated")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update course: {e}"))),
        ),
    }
}
