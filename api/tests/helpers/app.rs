use axum::Router;
use axum::body::Body;
use axum::http::Request;
use db::test_utils::setup_test_db;
use serde_json::Value;
use util::config::AppConfig;
use util::state::AppState;
use util::ws::WebSocketManager;

use api::routes::routes;
use api::ws::ws_routes;

/// Builds the full application router over a fresh in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_jwt_duration_minutes(60u64);

    let db = setup_test_db().await;
    let app_state = AppState::new(db, WebSocketManager::new());

    let app = Router::new()
        .nest("/api", routes(app_state.clone()))
        .nest("/ws", ws_routes(app_state.clone()));

    (app, app_state)
}

/// Builds an authenticated JSON request.
pub fn json_request(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Builds an authenticated GET request.
pub fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

/// Reads a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
