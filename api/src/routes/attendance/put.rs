use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use super::common::{RecordResponse, SetPresenceReq};
use crate::auth::AuthUser;
use crate::auth::guards::{Action, Resource, authorize};
use crate::response::ApiResponse;
use db::models::attendance_record::{Model as Record, OverrideError, OverrideOutcome};
use db::models::section;

/// PUT /api/attendance/sections/{section_id}/records
///
/// Manually sets a student's presence for one calendar date. Idempotent in
/// both directions; a record created by a QR scan can never be removed this
/// way.
///
/// **Auth**: Lecturer of the section or Admin.
pub async fn set_presence(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(section_id): Path<i64>,
    Json(body): Json<SetPresenceReq>,
) -> (StatusCode, Json<ApiResponse<Option<RecordResponse>>>) {
    let db = state.db();

    if let Err(denied) = authorize(
        db,
        &claims,
        Action::OverrideAttendance,
        Resource::Section(section_id),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

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
                Json(ApiResponse::error(format!("Failed to update attendance: {e}"))),
            );
        }
    }

    match Record::set_presence(db, section_id, &body.student_id, body.date, body.present).await {
        Ok(OverrideOutcome::MarkedPresent(record)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(RecordResponse::from_record(record, None)),
                "Attendance marked as present",
            )),
        ),
        Ok(OverrideOutcome::AlreadyPresent) => (
            StatusCode::OK,
            Json(ApiResponse::success(None, "Student already marked present")),
        ),
        Ok(OverrideOutcome::AlreadyAbsent) => (
            StatusCode::OK,
            Json(ApiResponse::success(None, "Student already marked absent")),
        ),
        Ok(OverrideOutcome::Removed) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                None,
                "Attendance marked as absent (manual record removed)",
            )),
        ),
        Err(OverrideError::CannotOverrideScanned) => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(
                "Cannot mark QR-scanned attendance as absent",
            )),
        ),
        Err(OverrideError::Db(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update attendance: {e}"))),
        ),
    }
}
