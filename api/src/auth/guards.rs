use crate::auth::claims::{AuthUser, Claims, Role};
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::section;
use sea_orm::DatabaseConnection;

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Helper to extract, validate user from request extensions and insert them back into the request
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.0.role != Role::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(next.run(req).await)
}

// --- Capability check ---

/// What the caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageCatalog,
    IssueToken,
    InspectToken,
    InvalidateToken,
    RecordScan,
    OverrideAttendance,
    ViewSectionRecords,
    ViewStudentHistory,
    ViewReports,
    ViewSystemReports,
}

/// What the action targets.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Course(&'a str),
    Section(i64),
    Student(&'a str),
    System,
}

/// A denied capability check, with a caller-facing reason.
#[derive(Debug)]
pub struct Forbidden(pub &'static str);

/// The single policy decision point for (actor, action, resource).
///
/// Admins may do everything except record a scan, which is a student act.
/// Lecturers are scoped to the courses and sections they teach. Students may
/// only scan for themselves and read their own history. Database errors
/// during a scope lookup deny the request.
pub async fn authorize(
    db: &DatabaseConnection,
    claims: &Claims,
    action: Action,
    resource: Resource<'_>,
) -> Result<(), Forbidden> {
    match claims.role {
        Role::Admin => match action {
            Action::RecordScan => Err(Forbidden(
                "Only students can record attendance via QR code",
            )),
            _ => Ok(()),
        },
        Role::Lecturer => {
            let Some(lecturer_id) = claims.lecturer_id() else {
                return Err(Forbidden("Invalid staff token"));
            };
            match (action, resource) {
                (
                    Action::IssueToken | Action::InspectToken | Action::InvalidateToken,
                    Resource::Course(course_code),
                ) => {
                    if teaches_course(db, lecturer_id, course_code).await {
                        Ok(())
                    } else {
                        Err(Forbidden(
                            "You can only manage QR codes for courses you are assigned to teach",
                        ))
                    }
                }
                (
                    Action::OverrideAttendance | Action::ViewSectionRecords,
                    Resource::Section(section_id),
                ) => {
                    if owns_section(db, lecturer_id, section_id).await {
                        Ok(())
                    } else {
                        Err(Forbidden(
                            "You can only manage attendance for your assigned sections",
                        ))
                    }
                }
                // Lecturers may read any student's history and session rosters,
                // and run reports over their own sections.
                (Action::ViewStudentHistory, Resource::Student(_)) => Ok(()),
                (Action::ViewReports, _) => Ok(()),
                _ => Err(Forbidden("Lecturers or Admins only")),
            }
        }
        Role::Student => match (action, resource) {
            (Action::RecordScan, Resource::Student(student_id))
                if student_id == claims.sub =>
            {
                Ok(())
            }
            (Action::ViewStudentHistory, Resource::Student(student_id)) => {
                if student_id == claims.sub {
                    Ok(())
                } else {
                    Err(Forbidden(
                        "Students can only view their own attendance records",
                    ))
                }
            }
            _ => Err(Forbidden("Lecturers or Admins only")),
        },
    }
}

async fn teaches_course(db: &DatabaseConnection, lecturer_id: i64, course_code: &str) -> bool {
    match section::Model::lecturer_teaches_course(db, lecturer_id, course_code).await {
        Ok(teaches) => teaches,
        Err(e) => {
            // Deny on DB error (fail-safe).
            tracing::warn!(error = %e, lecturer_id, course_code, "course scope check failed; denying");
            false
        }
    }
}

async fn owns_section(db: &DatabaseConnection, lecturer_id: i64, section_id: i64) -> bool {
    match section::Model::lecturer_owns_section(db, lecturer_id, section_id).await {
        Ok(owns) => owns,
        Err(e) => {
            tracing::warn!(error = %e, lecturer_id, section_id, "section scope check failed; denying");
            false
        }
    }
}
