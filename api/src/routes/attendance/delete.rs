use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::auth::guards::{Action, Resource, authorize};
use crate::response::ApiResponse;
use db::models::attendance_token;

/// DELETE /api/attendance/tokens/{token_id}
///
/// Explicitly invalidates a token before its natural expiry by deleting it.
///
/// **Auth**: Lecturer (for the token's course) or Admin.
pub async fn invalidate_token(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(token_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
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
                Json(ApiResponse::error(format!("Failed to invalidate QR code: {e}"))),
            );
        }
    };

    if let Err(denied) = authorize(
        db,
        &claims,
        Action::InvalidateToken,
        Resource::Course(&token.course_code),
    )
    .await
    {
        return (StatusCode::FORBIDDEN, Json(ApiResponse::error(denied.0)));
    }

    match attendance_token::Model::invalidate(db, token_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "QR code invalidated")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("QR code not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to invalidate QR code: {e}"))),
        ),
    }
}
