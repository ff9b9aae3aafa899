mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use db::models::{lecturer, student};
use helpers::app::{body_json, get_request, make_test_app};

#[tokio::test]
#[serial]
async fn login_resolves_role_across_user_tables() {
    let (app, state) = make_test_app().await;
    let db = state.db();

    student::Model::create(db, "S1001", "Lee Wei", "lee@test.com", "password123")
        .await
        .unwrap();
    lecturer::Model::create(db, "Aminah Yusof", "aminah@test.com", "password123", false)
        .await
        .unwrap();
    lecturer::Model::create(db, "Admin", "admin@test.com", "password123", true)
        .await
        .unwrap();

    for (email, expected_role) in [
        ("lee@test.com", "student"),
        ("aminah@test.com", "lecturer"),
        ("admin@test.com", "admin"),
    ] {
        let req = helpers::app::json_request(
            "POST",
            "/api/auth/login",
            "", // login is public; the bearer header is ignored
            &json!({"email": email, "password": "password123"}),
        );
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "login failed for {email}");
        let body = body_json(resp).await;
        assert_eq!(body["data"]["role"], expected_role);
        assert!(body["data"]["token"].as_str().is_some());

        // The issued token passes verification.
        let token = body["data"]["token"].as_str().unwrap().to_string();
        let resp = app
            .clone()
            .oneshot(get_request("/api/auth/verify", &token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[tokio::test]
#[serial]
async fn login_rejects_bad_credentials() {
    let (app, state) = make_test_app().await;
    let db = state.db();

    student::Model::create(db, "S1001", "Lee Wei", "lee@test.com", "password123")
        .await
        .unwrap();

    let req = helpers::app::json_request(
        "POST",
        "/api/auth/login",
        "",
        &json!({"email": "lee@test.com", "password": "wrong"}),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = helpers::app::json_request(
        "POST",
        "/api/auth/login",
        "",
        &json!({"email": "nobody@test.com", "password": "password123"}),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn catalog_routes_require_admin() {
    let (app, state) = make_test_app().await;
    let db = state.db();

    lecturer::Model::create(db, "Aminah Yusof", "aminah@test.com", "password123", false)
        .await
        .unwrap();

    // Unauthenticated.
    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/api/students")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Authenticated but not admin.
    let (token, _) = api::auth::generate_jwt("1", api::auth::Role::Lecturer);
    let resp = app
        .clone()
        .oneshot(get_request("/api/students", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (token, _) = api::auth::generate_jwt("1", api::auth::Role::Admin);
    let resp = app
        .clone()
        .oneshot(get_request("/api/students", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
