use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, QueryOrder};
use util::state::AppState;

use super::common::LecturerResponse;
use crate::response::ApiResponse;
use db::models::lecturer;

/// GET /api/lecturers
///
/// **Auth**: Admin.
pub async fn list_lecturers(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<LecturerResponse>>>) {
    let db = state.db();

    match lecturer::Entity::find()
        .order_by_asc(lecturer::Column::LecturerId)
        .all(db)
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(LecturerResponse::from).collect(),
                "Lecturers retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve lecturers: {e}"))),
        ),
    }
}

/// GET /api/lecturers/{lecturer_id}
///
/// **Auth**: Admin.
pub async fn get_lecturer(
    State(state): State<AppState>,
    Path(lecturer_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<LecturerResponse>>) {
    let db = state.db();

    match lecturer::Entity::find_by_id(lecturer_id).one(db).await {
        Ok(Some(row)) => (
            StatusCode::OK,
            Json(ApiResponse::success(LecturerResponse::from(row), "Lecturer retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Lecturer not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve lecturer: {e}"))),
        ),
    }
}
