use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use util::state::AppState;
use validator::Validate;

use super::common::{EditLecturerReq, LecturerResponse};
use crate::response::ApiResponse;
use db::models::lecturer;

/// PUT /api/lecturers/{lecturer_id}
///
/// Updates profile fields, the admin flag, and optionally the password.
///
/// **Auth**: Admin.
pub async fn edit_lecturer(
    State(state): State<AppState>,
    Path(lecturer_id): Path<i64>,
    Json(body): Json<EditLecturerReq>,
) -> (StatusCode, Json<ApiResponse<LecturerResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid lecturer: {e}"))),
        );
    }

    let db = state.db();
    let existing = match lecturer::Entity::find_by_id(lecturer_id).one(db).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Lecturer not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to retrieve lecturer: {e}"))),
            );
        }
    };

    let mut am: lecturer::ActiveModel = existing.into();
    if let Some(name) = body.name {
        am.name = Set(name);
    }
    if let Some(email) = body.email {
        am.email = Set(email);
    }
    if let Some(admin) = body.admin {
        am.admin = Set(admin);
    }
    if let Some(password) = body.password {
        match lecturer::hash_password(&password) {
            Ok(hash) => am.password_hash = Set(hash),
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(format!("Failed to update lecturer: {e}"))),
                );
            }
        }
    }
    am.updated_at = Set(Utc::now());

    match am.update(db).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(LecturerResponse::from(updated), "Lecturer updated")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update lecturer: {e}"))),
        ),
    }
}
