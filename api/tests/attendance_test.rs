mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use api::auth::{Role, generate_jwt};
use db::models::{attendance_token, course, lecturer, section, section_student, student};
use helpers::app::{body_json, get_request, json_request, make_test_app};

struct Ctx {
    lecturer: lecturer::Model,
    other_lecturer: lecturer::Model,
    admin: lecturer::Model,
    section: section::Model,
}

async fn seed(db: &DatabaseConnection) -> Ctx {
    course::Model::create(db, "NET301", "Computer Networks")
        .await
        .unwrap();
    let lecturer = lecturer::Model::create(db, "Aminah Yusof", "aminah@test.com", "password", false)
        .await
        .unwrap();
    let other_lecturer =
        lecturer::Model::create(db, "Tan Mei Ling", "tan@test.com", "password", false)
            .await
            .unwrap();
    let admin = lecturer::Model::create(db, "Admin", "admin@test.com", "password", true)
        .await
        .unwrap();
    let section = section::Model::create(db, "NET301-A", "NET301", lecturer.lecturer_id)
        .await
        .unwrap();

    for (id, email) in [("S1001", "lee@test.com"), ("S1002", "nur@test.com")] {
        student::Model::create(db, id, id, email, "password").await.unwrap();
        section_student::Model::enroll(db, section.section_id, id)
            .await
            .unwrap();
    }

    Ctx {
        lecturer,
        other_lecturer,
        admin,
        section,
    }
}

fn staff_token(l: &lecturer::Model) -> String {
    let role = if l.admin { Role::Admin } else { Role::Lecturer };
    generate_jwt(&l.lecturer_id.to_string(), role).0
}

#[tokio::test]
#[serial]
async fn scan_flow_records_once_and_acknowledges_duplicates() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    // Lecturer issues a token for their course.
    let issue = json_request(
        "POST",
        "/api/attendance/tokens",
        &staff_token(&ctx.lecturer),
        &json!({"course_code": "NET301"}),
    );
    let resp = app.clone().oneshot(issue).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    let qr_string = body["data"]["qr_string"].as_str().unwrap().to_string();

    // Student scans it.
    let (student_token, _) = generate_jwt("S1001", Role::Student);
    let scan_body = json!({"qr_string": qr_string, "section_id": ctx.section.section_id});
    let scan = json_request("POST", "/api/attendance/scans", &student_token, &scan_body);
    let resp = app.clone().oneshot(scan).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["student_id"], "S1001");
    assert_eq!(body["data"]["manual_override"], false);

    // A second scan is a silent no-op, not an error.
    let scan = json_request("POST", "/api/attendance/scans", &student_token, &scan_body);
    let resp = app.clone().oneshot(scan).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::Value::Null);
    assert_eq!(body["message"], "Attendance already recorded for this session");
}

#[tokio::test]
#[serial]
async fn staff_cannot_scan_and_students_cannot_issue() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let scan = json_request(
        "POST",
        "/api/attendance/scans",
        &staff_token(&ctx.lecturer),
        &json!({"qr_string": "anything", "section_id": ctx.section.section_id}),
    );
    let resp = app.clone().oneshot(scan).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (student_token, _) = generate_jwt("S1001", Role::Student);
    let issue = json_request(
        "POST",
        "/api/attendance/tokens",
        &student_token,
        &json!({"course_code": "NET301"}),
    );
    let resp = app.clone().oneshot(issue).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn token_issuance_is_scoped_to_taught_courses() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    // A lecturer with no NET301 sections is refused.
    let issue = json_request(
        "POST",
        "/api/attendance/tokens",
        &staff_token(&ctx.other_lecturer),
        &json!({"course_code": "NET301"}),
    );
    let resp = app.clone().oneshot(issue).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // An admin is not scoped.
    let issue = json_request(
        "POST",
        "/api/attendance/tokens",
        &staff_token(&ctx.admin),
        &json!({"course_code": "NET301"}),
    );
    let resp = app.clone().oneshot(issue).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[serial]
async fn expired_tokens_are_rejected_distinctly_from_unknown_ones() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;
    let db = state.db();

    let token = attendance_token::Model::issue(db, "NET301", Some(10), None)
        .await
        .unwrap();
    let mut am: attendance_token::ActiveModel = token.clone().into();
    am.expires_at = Set(Utc::now() - Duration::minutes(1));
    am.update(db).await.unwrap();

    let (student_token, _) = generate_jwt("S1001", Role::Student);
    let scan = json_request(
        "POST",
        "/api/attendance/scans",
        &student_token,
        &json!({"qr_string": token.qr_string, "section_id": ctx.section.section_id}),
    );
    let resp = app.clone().oneshot(scan).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "QR code has expired");

    let scan = json_request(
        "POST",
        "/api/attendance/scans",
        &student_token,
        &json!({"qr_string": "unknown", "section_id": ctx.section.section_id}),
    );
    let resp = app.clone().oneshot(scan).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn manual_override_respects_scan_evidence() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;
    let lect = staff_token(&ctx.lecturer);
    let uri = format!("/api/attendance/sections/{}/records", ctx.section.section_id);

    // Mark S1002 present manually.
    let req = json_request(
        "PUT",
        &uri,
        &lect,
        &json!({"student_id": "S1002", "date": "2025-03-10", "present": true}),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["manual_override"], true);

    // A scanned record for S1001 cannot be marked absent.
    let token = attendance_token::Model::issue(state.db(), "NET301", None, None)
        .await
        .unwrap();
    let (student_token, _) = generate_jwt("S1001", Role::Student);
    let scan = json_request(
        "POST",
        "/api/attendance/scans",
        &student_token,
        &json!({"qr_string": token.qr_string, "section_id": ctx.section.section_id}),
    );
    assert_eq!(app.clone().oneshot(scan).await.unwrap().status(), StatusCode::CREATED);

    let today = Utc::now().date_naive();
    let req = json_request(
        "PUT",
        &uri,
        &lect,
        &json!({"student_id": "S1001", "date": today, "present": false}),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Cannot mark QR-scanned attendance as absent");

    // The other lecturer does not own this section.
    let req = json_request(
        "PUT",
        &uri,
        &staff_token(&ctx.other_lecturer),
        &json!({"student_id": "S1002", "date": "2025-03-10", "present": false}),
    );
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn history_is_private_to_the_student_but_open_to_staff() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (own_token, _) = generate_jwt("S1001", Role::Student);
    let resp = app
        .clone()
        .oneshot(get_request("/api/attendance/students/S1001/history", &own_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(get_request("/api/attendance/students/S1002/history", &own_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(get_request(
            "/api/attendance/students/S1002/history",
            &staff_token(&ctx.lecturer),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn history_reports_absences_for_missed_sessions() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;
    let db = state.db();

    use db::models::attendance_record::Model as Record;
    let d1 = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let d2 = chrono::NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
    Record::set_presence(db, ctx.section.section_id, "S1001", d1, true)
        .await
        .unwrap();
    Record::set_presence(db, ctx.section.section_id, "S1001", d2, true)
        .await
        .unwrap();

    let (token, _) = generate_jwt("S1002", Role::Student);
    let resp = app
        .clone()
        .oneshot(get_request("/api/attendance/students/S1002/history", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["status"] == "Absent"));
    assert_eq!(entries[0]["date"], "2024-01-12");
    assert_eq!(entries[1]["date"], "2024-01-10");
}
