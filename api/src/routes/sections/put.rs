use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use util::state::AppState;
use validator::Validate;

use super::common::{EditSectionReq, SectionResponse, with_display_names};
use crate::response::ApiResponse;
use db::models::{lecturer, section};

/// PUT /api/sections/{section_id}
///
/// **Auth**: Admin.
pub async fn edit_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(body): Json<EditSectionReq>,
) -> (StatusCode, Json<ApiResponse<SectionResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid section: {e}"))),
        );
    }

    let db = state.db();
    let existing = match section::Entity::find_by_id(section_id).one(db).await {
        Ok(Some(row)) => row,
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
    };

    if let Some(lecturer_id) = body.lecturer_id {
        match lecturer::Entity::find_by_id(lecturer_id).one(db).await {
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
                    Json(ApiResponse::error(format!("Failed to update section: {e}"))),
                );
            }
        }
    }

    let mut am: section::ActiveModel = existing.into();
    if let Some(name) = body.section_name {
        am.section_name = Set(name);
    }
    if let Some(lecturer_id) = body.lecturer_id {
        am.lecturer_id = Set(lecturer_id);
    }
    am.updated_at = Set(Utc::now());

    match am.update(db).await {
        Ok(updated) => match with_display_names(db, vec![updated]).await {
            Ok(mut resp) if !resp.is_empty() => (
                StatusCode::OK,
                Json(ApiResponse::success(resp.remove(0), "Section updated")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update section")),
            ),
        },
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update section: {e}"))),
        ),
    }
}
