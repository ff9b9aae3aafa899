use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use util::state::AppState;

use super::common::{CourseDetailsResponse, CourseResponse, CourseSection};
use crate::response::ApiResponse;
use db::models::{course, lecturer, section};

/// GET /api/courses
///
/// **Auth**: Admin.
pub async fn list_courses(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<CourseResponse>>>) {
    let db = state.db();

    match course::Entity::find()
        .order_by_asc(course::Column::CourseCode)
        .all(db)
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(CourseResponse::from).collect(),
                "Courses retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve courses: {e}"))),
        ),
    }
}

/// GET /api/courses/{course_code}
///
/// Fetches a course together with its sections and their lecturers.
///
/// **Auth**: Admin.
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_code): Path<String>,
) -> (StatusCode, Json<ApiResponse<CourseDetailsResponse>>) {
    let db = state.db();

    let found = match course::Model::find_by_code(db, &course_code).await {
        Ok(found) => found,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to retrieve course: {e}"))),
            );
        }
    };
    let Some(row) = found else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Course not found")),
        );
    };

    let sections = section::Entity::find()
        .filter(section::Column::CourseCode.eq(&course_code))
        .find_also_related(lecturer::Entity)
        .all(db)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|(s, l)| CourseSection {
            section_id: s.section_id,
            section_name: s.section_name,
            lecturer_id: s.lecturer_id,
            lecturer_name: l.map(|l| l.name).unwrap_or_default(),
        })
        .collect();

    let resp = CourseDetailsResponse {
        course: CourseResponse::from(row),
        sections,
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Course retrieved")),
    )
}
