use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;
use validator::Validate;

use super::common::{CreateSectionReq, EnrollStudentReq, SectionResponse, with_display_names};
use crate::response::ApiResponse;
use db::models::{course, lecturer, section, section_student, student};

/// POST /api/sections
///
/// **Auth**: Admin.
pub async fn create_section(
    State(state): State<AppState>,
    Json(body): Json<CreateSectionReq>,
) -> (StatusCode, Json<ApiResponse<SectionResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid section: {e}"))),
        );
    }

    let db = state.db();

    match course::Model::find_by_code(db, &body.course_code).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Course not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create section: {e}"))),
            );
        }
    }
    match lecturer::Entity::find_by_id(body.lecturer_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Lecturer not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create section: {e}"))),
            );
        }
    }

    match section::Model::create(db, &body.section_name, &body.course_code, body.lecturer_id).await
    {
        Ok(row) => match with_display_names(db, vec![row]).await {
            Ok(mut resp) if !resp.is_empty() => (
                StatusCode::CREATED,
                Json(ApiResponse::success(resp.remove(0), "Section created")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create section")),
            ),
        },
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create section: {e}"))),
        ),
    }
}

/// POST /api/sections/{section_id}/students
///
/// Enrolls a student into the section. Enrolling an already-enrolled student
/// is a no-op that reports success.
///
/// **Auth**: Admin.
pub async fn enroll_student(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(body): Json<EnrollStudentReq>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match section::Entity::find_by_id(section_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Section not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to enroll student: {e}"))),
            );
        }
    }
    match student::Entity::find_by_id(body.student_id.clone()).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to enroll student: {e}"))),
            );
        }
    }

    match section_student::Model::enroll(db, section_id, &body.student_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student enrolled in section")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to enroll student: {e}"))),
        ),
    }
}
