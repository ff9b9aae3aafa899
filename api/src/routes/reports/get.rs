use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::EntityTrait;
use util::state::AppState;

use super::common::RatesQuery;
use crate::auth::guards::{Action, Resource, authorize};
use crate::auth::{AuthUser, Role};
use crate::response::ApiResponse;
use db::models::section;
use db::reporting::{self, AtRiskStudent, DashboardSummary, DayRosterEntry, SectionDayRate};

/// GET /api/reports/attendance-rates
///
/// Per (section, day) rollups: distinct present students over the section's
/// static enrollment count. Lecturers see their own sections; admins see all
/// sections or one lecturer's via `lecturer_id`.
///
/// **Query**: `lecturer_id?`, `section_id?`, `course_code?`, `start_date?`,
/// `end_date?` (dates are `YYYY-MM-DD`).
pub async fn attendance_rates(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<RatesQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<SectionDayRate>>>) {
    let db = state.db();

    if let Err(denied) = authorize(db, &claims, Action::ViewReports, Resource::System).await {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    // Resolve the visible section set for this caller.
    let sections = match claims.role {
        Role::Lecturer => {
            let Some(lecturer_id) = claims.lecturer_id() else {
                return (
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::error("Invalid staff token")),
                );
            };
            section::Model::taught_by(db, lecturer_id).await
        }
        Role::Admin => match q.lecturer_id {
            Some(lecturer_id) => section::Model::taught_by(db, lecturer_id).await,
            None => section::Entity::find().all(db).await,
        },
        Role::Student => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Lecturers or Admins only")),
            );
        }
    };
    let sections = match sections {
        Ok(sections) => sections,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to generate report: {e}"))),
            );
        }
    };
    if sections.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("No sections found for this report")),
        );
    }

    let mut section_ids: Vec<i64> = sections.iter().map(|s| s.section_id).collect();
    if let Some(wanted) = q.section_id {
        if !section_ids.contains(&wanted) {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(
                    "Specified section not found in this report's scope",
                )),
            );
        }
        section_ids = vec![wanted];
    }

    match reporting::section_day_rates(
        db,
        &section_ids,
        q.start_date,
        q.end_date,
        q.course_code.as_deref(),
    )
    .await
    {
        Ok(rates) => (
            StatusCode::OK,
            Json(ApiResponse::success(rates, "Attendance report generated")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to generate report: {e}"))),
        ),
    }
}

/// GET /api/reports/sections/{section_id}/days/{date}
///
/// The full enrolled roster for one section/day with presence and
/// manual-override flags.
///
/// **Auth**: Lecturer of the section or Admin.
pub async fn day_roster(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path((section_id, date)): Path<(i64, NaiveDate)>,
) -> (StatusCode, Json<ApiResponse<Vec<DayRosterEntry>>>) {
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
                Json(ApiResponse::error(format!("Failed to generate report: {e}"))),
            );
        }
    }

    match reporting::section_day_roster(db, section_id, date).await {
        Ok(roster) => (
            StatusCode::OK,
            Json(ApiResponse::success(roster, "Day roster retrieved")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to generate report: {e}"))),
        ),
    }
}

/// GET /api/reports/at-risk-students
///
/// Students whose presence-rows / enrolled-sections ratio is below 0.8. This
/// is deliberately a different (coarser) metric than the per-day percentage.
///
/// **Auth**: Admin.
pub async fn at_risk(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<AtRiskStudent>>>) {
    let db = state.db();

    if let Err(denied) = authorize(db, &claims, Action::ViewSystemReports, Resource::System).await {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    match reporting::at_risk_students(db).await {
        Ok(students) => (
            StatusCode::OK,
            Json(ApiResponse::success(students, "At-risk students retrieved")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to fetch at-risk students: {e}"))),
        ),
    }
}

/// GET /api/reports/dashboard-summary
///
/// **Auth**: Admin.
pub async fn dashboard_summary(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Option<DashboardSummary>>>) {
    let db = state.db();

    if let Err(denied) = authorize(db, &claims, Action::ViewSystemReports, Resource::System).await {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    match reporting::dashboard_summary(db).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(summary), "Dashboard summary retrieved")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to fetch dashboard summary: {e}"))),
        ),
    }
}
