use axum::{Json, extract::State, http::StatusCode};
use sea_orm::SqlErr;
use util::state::AppState;
use validator::Validate;

use super::common::{CreateLecturerReq, LecturerResponse};
use crate::response::ApiResponse;
use db::models::lecturer;

/// POST /api/lecturers
///
/// **Auth**: Admin.
pub async fn create_lecturer(
    State(state): State<AppState>,
    Json(body): Json<CreateLecturerReq>,
) -> (StatusCode, Json<ApiResponse<LecturerResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid lecturer: {e}"))),
        );
    }

    let db = state.db();
    match lecturer::Model::create(
        db,
        &body.name,
        &body.email,
        &body.password,
        body.admin.unwrap_or(false),
    )
    .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(LecturerResponse::from(row), "Lecturer created")),
        ),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Email already exists")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to create lecturer: {e}"))),
            ),
        },
    }
}
