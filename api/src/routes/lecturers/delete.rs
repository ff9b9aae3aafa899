use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::lecturer;

/// DELETE /api/lecturers/{lecturer_id}
///
/// Refused while the lecturer still teaches sections (restrict FK).
///
/// **Auth**: Admin.
pub async fn delete_lecturer(
    State(state): State<AppState>,
    Path(lecturer_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match lecturer::Entity::delete_by_id(lecturer_id).exec(db).await {
        Ok(dr) if dr.rows_affected > 0 => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Lecturer deleted")),
        ),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Lecturer not found")),
        ),
        Err(e) => match e.sql_err() {
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "Lecturer still teaches sections and cannot be deleted",
                )),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to delete lecturer: {e}"))),
            ),
        },
    }
}
