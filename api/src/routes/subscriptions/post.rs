use axum::{Extension, Json, extract::State, http::StatusCode};
use util::state::AppState;

use crate::auth::{AuthUser, Role};
use crate::response::ApiResponse;
use db::models::push_subscription::{self, UserKind};

/// POST /api/subscriptions
///
/// Stores the caller's Web Push subscription as handed over by the browser.
/// Saving the same endpoint twice is a no-op.
///
/// **Auth**: any authenticated user.
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let Some(endpoint) = body.get("endpoint").and_then(|e| e.as_str()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Subscription must include an endpoint")),
        );
    };

    let user_type = match claims.role {
        Role::Student => UserKind::Student,
        Role::Lecturer | Role::Admin => UserKind::Lecturer,
    };

    let db = state.db();
    match push_subscription::Model::save(db, &claims.sub, user_type, endpoint, &body.to_string())
        .await
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ApiResponse::success((), "Push subscription saved")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to save subscription: {e}"))),
        ),
    }
}
