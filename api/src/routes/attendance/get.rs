use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use super::common::{RecordResponse, TokenResponse};
use crate::auth::AuthUser;
use crate::auth::guards::{Action, Resource, authorize};
use crate::response::ApiResponse;
use db::models::attendance_record::Model as Record;
use db::models::{attendance_token, student};
use db::reporting::{self, HistoryEntry};

/// GET /api/attendance/tokens/{token_id}
///
/// **Auth**: Lecturer (for the token's course) or Admin.
pub async fn get_token(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(token_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<TokenResponse>>) {
    let db = state.db();

    let token = match attendance_token::Entity::find_by_id(token_id).one(db).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("QR code not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to retrieve QR code: {e}"))),
            );
        }
    };

    if let Err(denied) = authorize(
        db,
        &claims,
        Action::InspectToken,
        Resource::Course(&token.course_code),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(TokenResponse::from(token), "QR code retrieved")),
    )
}

/// GET /api/attendance/sections/{section_id}/records
///
/// All presence records for a section, newest first, with student names and
/// token linkage.
///
/// **Auth**: Lecturer of the section or Admin.
pub async fn section_records(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(section_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<RecordResponse>>>) {
    let db = state.db();

    if let Err(denied) = authorize(
        db,
        &claims,
        Action::ViewSectionRecords,
        Resource::Section(section_id),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    match db::models::section::Entity::find_by_id(section_id).one(db).await {
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
                Json(ApiResponse::error(format!("Failed to retrieve attendance: {e}"))),
            );
        }
    }

    match Record::for_section(db, section_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter()
                    .map(|(r, s)| RecordResponse::from_record(r, s))
                    .collect(),
                "Attendance records retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve attendance: {e}"))),
        ),
    }
}

/// GET /api/attendance/sessions/{session_id}/records
///
/// Records for one class occurrence in scan order.
///
/// **Auth**: Lecturer or Admin.
pub async fn session_records(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> (StatusCode, Json<ApiResponse<Vec<RecordResponse>>>) {
    if !claims.role.is_staff() {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Lecturers or Admins only")),
        );
    }

    let db = state.db();
    match Record::for_session(db, &session_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter()
                    .map(|(r, s)| RecordResponse::from_record(r, s))
                    .collect(),
                "Session attendance retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve session attendance: {e}"))),
        ),
    }
}

/// GET /api/attendance/students/{student_id}/history
///
/// The student's reconciled Present/Absent timeline, newest date first.
/// Days where the section held a session the student missed appear as
/// `Absent` entries with no timestamp.
///
/// **Auth**: the student themself, any Lecturer, or Admin.
pub async fn student_history(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<String>,
) -> (StatusCode, Json<ApiResponse<Vec<HistoryEntry>>>) {
    let db = state.db();

    if let Err(denied) = authorize(
        db,
        &claims,
        Action::ViewStudentHistory,
        Resource::Student(&student_id),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    match student::Entity::find_by_id(student_id.clone()).one(db).await {
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
                Json(ApiResponse::error(format!("Failed to retrieve history: {e}"))),
            );
        }
    }

    match reporting::student_history(db, &student_id).await {
        Ok(history) => (
            StatusCode::OK,
            Json(ApiResponse::success(history, "Attendance history retrieved")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to retrieve history: {e}"))),
        ),
    }
}
