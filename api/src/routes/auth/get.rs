use axum::{Json, http::StatusCode};

use super::common::VerifyResponse;
use crate::auth::AuthUser;
use crate::response::ApiResponse;

/// GET /api/auth/verify
///
/// Echoes the authenticated caller's claims. A `401` from the extractor means
/// the token is missing, malformed, or expired.
pub async fn verify(AuthUser(claims): AuthUser) -> (StatusCode, Json<ApiResponse<VerifyResponse>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            VerifyResponse {
                id: claims.sub.clone(),
                role: format!("{:?}", claims.role).to_lowercase(),
            },
            "Token is valid",
        )),
    )
}
