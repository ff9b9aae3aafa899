use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use util::state::AppState;
use validator::Validate;

use super::common::{EditStudentReq, StudentResponse};
use crate::response::ApiResponse;
use db::models::student;

/// PUT /api/students/{student_id}
///
/// Updates profile fields; a supplied password is re-hashed before storage.
///
/// **Auth**: Admin.
pub async fn edit_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(body): Json<EditStudentReq>,
) -> (StatusCode, Json<ApiResponse<StudentResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid student: {e}"))),
        );
    }

    let db = state.db();
    let existing = match student::Entity::find_by_id(student_id).one(db).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to retrieve student: {e}"))),
            );
        }
    };

    let mut am: student::ActiveModel = existing.into();
    if let Some(name) = body.name {
        am.name = Set(name);
    }
    if let Some(email) = body.email {
        am.email = Set(email);
    }
    if let Some(password) = body.password {
        match db::models::lecturer::hash_password(&password) {
            Ok(hash) => am.password_hash = Set(hash),
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to update student: {e}"))),
                );
            }
        }
    }
    am.updated_at = Set(Utc::now());

    match am.update(db).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(StudentResponse::from(updated), "Student updated")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update student: {e}"))),
        ),
    }
}
