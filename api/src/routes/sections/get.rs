use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use util::state::AppState;

use super::common::{SectionResponse, with_display_names};
use crate::response::ApiResponse;
use crate::routes::students::common::StudentResponse;
use db::models::{section, section_student, student};

/// GET /api/sections
///
/// **Auth**: Admin.
pub async fn list_sections(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SectionResponse>>>) {
    let db = state.db();

    let rows = match section::Entity::find()
        .order_by_asc(section::Column::SectionId)
        .all(db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to retrieve sections: {e}"))),
            );
        }
    };

    match with_display_names(db, rows).await {
        Ok(resp) => (
            StatusCode::OK,
            Json(ApiResponse::success(resp, "Sections retrieved")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve sections: {e}"))),
        ),
    }
}

/// GET /api/sections/{section_id}
///
/// **Auth**: Admin.
pub async fn get_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<SectionResponse>>) {
    let db = state.db();

    match section::Entity::find_by_id(section_id).one(db).await {
        Ok(Some(row)) => match with_display_names(db, vec![row]).await {
            Ok(mut resp) if !resp.is_empty() => (
                StatusCode::OK,
                Json(ApiResponse::success(resp.remove(0), "Section retrieved")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to retrieve section")),
            ),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Section not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve section: {e}"))),
        ),
    }
}

/// GET /api/sections/{section_id}/students
///
/// The section's enrolled roster.
///
/// **Auth**: Admin.
pub async fn list_section_students(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<StudentResponse>>>) {
    let db = state.db();

    let exists = section::Entity::find_by_id(section_id).one(db).await;
    match exists {
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
                Json(ApiResponse::error(format!("Failed to retrieve section: {e}"))),
            );
        }
    }

    match section_student::Entity::find()
        .filter(section_student::Column::SectionId.eq(section_id))
        .find_also_related(student::Entity)
        .all(db)
        .await
    {
        Ok(rows) => {
            let students: Vec<StudentResponse> = rows
                .into_iter()
                .filter_map(|(_, stu)| stu.map(StudentResponse::from))
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(students, "Section roster retrieved")),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve roster: {e}"))),
        ),
    }
}
