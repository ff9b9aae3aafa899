use axum::{Json, extract::State, http::StatusCode};
use util::state::AppState;
use validator::Validate;

use super::common::{LoginRequest, LoginResponse};
use crate::auth::{Role, generate_jwt};
use crate::response::ApiResponse;
use db::models::{lecturer, student};

/// POST /api/auth/login
///
/// Authenticates a user by email and password. Students are looked up first,
/// then lecturers; a lecturer with the admin flag logs in with the `admin`
/// role.
///
/// **Response**: a signed JWT plus its expiry and the user's public profile.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid login request: {e}"))),
        );
    }

    let db = state.db();

    let resolved = match resolve_user(db, &req.email).await {
        Ok(found) => found,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let Some(user) = resolved else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials: User not found")),
        );
    };

    if !user.password_matches(&req.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials: Incorrect password")),
        );
    }

    let (token, expires_at) = generate_jwt(&user.id, user.role);
    let response = LoginResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: role_name(user.role).to_string(),
        token,
        expires_at,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(response, "Login successful")),
    )
}

struct ResolvedUser {
    id: String,
    name: String,
    email: String,
    role: Role,
    account: Account,
}

enum Account {
    Student(student::Model),
    Lecturer(lecturer::Model),
}

impl ResolvedUser {
    fn password_matches(&self, password: &str) -> bool {
        match &self.account {
            Account::Student(s) => s.verify_password(password),
            Account::Lecturer(l) => l.verify_password(password),
        }
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Student => "student",
        Role::Lecturer => "lecturer",
        Role::Admin => "admin",
    }
}

async fn resolve_user(
    db: &sea_orm::DatabaseConnection,
    email: &str,
) -> Result<Option<ResolvedUser>, sea_orm::DbErr> {
    if let Some(s) = student::Model::find_by_email(db, email).await? {
        return Ok(Some(ResolvedUser {
            id: s.student_id.clone(),
            name: s.name.clone(),
            email: s.email.clone(),
            role: Role::Student,
            account: Account::Student(s),
        }));
    }

    if let Some(l) = lecturer::Model::find_by_email(db, email).await? {
        let role = if l.admin { Role::Admin } else { Role::Lecturer };
        return Ok(Some(ResolvedUser {
            id: l.lecturer_id.to_string(),
            name: l.name.clone(),
            email: l.email.clone(),
            role,
            account: Account::Lecturer(l),
        }));
    }

    Ok(None)
}
