use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{EntityTrait, SqlErr};
use util::state::AppState;
use validator::Validate;

use super::common::{IssueTokenReq, RecordScanReq, RecordResponse, TokenResponse};
use crate::auth::guards::{Action, Resource, authorize};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::ws::attendance::{AttendanceMarked, attendance_marked};
use db::models::attendance_record::{Model as Record, ScanError, ScanOutcome};
use db::models::{attendance_token, section, student};

/// POST /api/attendance/tokens
///
/// Issues a fresh QR token for a course, optionally continuing an existing
/// session. Course existence is enforced by the foreign key, not checked
/// up front.
///
/// **Auth**: Lecturer (for courses they teach) or Admin.
pub async fn issue_token(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<IssueTokenReq>,
) -> (StatusCode, Json<ApiResponse<TokenResponse>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid request: {e}"))),
        );
    }

    let db = state.db();
    if let Err(denied) = authorize(
        db,
        &claims,
        Action::IssueToken,
        Resource::Course(&body.course_code),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    match attendance_token::Model::issue(db, &body.course_code, body.validity_minutes, body.session_id)
        .await
    {
        Ok(token) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(TokenResponse::from(token), "QR code generated")),
        ),
        Err(e) => match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Course not found")),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to generate QR code: {e}"))),
            ),
        },
    }
}

/// POST /api/attendance/scans
///
/// Records a student's QR scan. A duplicate scan within the same session is
/// acknowledged with `200` and writes nothing. On success a real-time
/// `attendance_marked` event is broadcast to the section topic; broadcast
/// failure never affects the stored record.
///
/// **Auth**: Student (for themself).
pub async fn record_scan(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<RecordScanReq>,
) -> (StatusCode, Json<ApiResponse<Option<RecordResponse>>>) {
    let db = state.db();

    if let Err(denied) = authorize(
        db,
        &claims,
        Action::RecordScan,
        Resource::Student(&claims.sub),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    let now = Utc::now();
    match Record::record_scan(db, &claims.sub, body.section_id, &body.qr_string, now).await {
        Ok(ScanOutcome::Recorded(record)) => {
            let stu = student::Entity::find_by_id(record.student_id.clone())
                .one(db)
                .await
                .ok()
                .flatten();
            let sec = section::Entity::find_by_id(record.section_id)
                .one(db)
                .await
                .ok()
                .flatten();

            if let Some(sec) = &sec {
                let event = AttendanceMarked {
                    record_id: record.record_id,
                    student_id: record.student_id.clone(),
                    student_name: stu.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
                    section_id: record.section_id,
                    section_name: sec.section_name.clone(),
                    session_id: record.session_id.clone(),
                    course_code: sec.course_code.clone(),
                    attended_at: record.attended_at.to_rfc3339(),
                };
                attendance_marked(state.ws(), &event).await;
            }

            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(RecordResponse::from_record(record, stu)),
                    "Attendance recorded",
                )),
            )
        }
        Ok(ScanOutcome::AlreadyRecorded) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                None,
                "Attendance already recorded for this session",
            )),
        ),
        Err(ScanError::TokenNotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("QR code not found")),
        ),
        Err(ScanError::TokenExpired { token }) => {
            tracing::debug!(
                course_code = %token.course_code,
                session_id = %token.session_id,
                expired_at = %token.expires_at,
                "rejected scan of expired QR code"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("QR code has expired")),
            )
        }
        Err(ScanError::SectionNotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Provided section not found")),
        ),
        Err(ScanError::CourseMismatch) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "Provided section does not belong to the QR code's course",
            )),
        ),
        Err(ScanError::NotEnrolled) => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(
                "You are not enrolled in the course associated with this QR code",
            )),
        ),
        Err(ScanError::Db(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to record attendance: {e}"))),
        ),
    }
}
