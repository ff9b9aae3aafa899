mod helpers;

use axum::http::StatusCode;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serial_test::serial;
use tower::ServiceExt;

use api::auth::{Role, generate_jwt};
use db::models::attendance_record::Model as Record;
use db::models::{course, lecturer, section, section_student, student};
use helpers::app::{body_json, get_request, make_test_app};

struct Ctx {
    lecturer: lecturer::Model,
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
    let admin = lecturer::Model::create(db, "Admin", "admin@test.com", "password", true)
        .await
        .unwrap();
    let section = section::Model::create(db, "NET301-A", "NET301", lecturer.lecturer_id)
        .await
        .unwrap();

    for i in 0..10 {
        let id = format!("S10{i:02}");
        student::Model::create(db, &id, &id, &format!("s10{i:02}@test.com"), "password")
            .await
            .unwrap();
        section_student::Model::enroll(db, section.section_id, &id)
            .await
            .unwrap();
    }

    Ctx {
        lecturer,
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
async fn rates_report_counts_distinct_present_over_enrollment() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    for id in ["S1000", "S1001", "S1002"] {
        Record::set_presence(state.db(), ctx.section.section_id, id, d, true)
            .await
            .unwrap();
    }

    let resp = app
        .clone()
        .oneshot(get_request(
            "/api/reports/attendance-rates",
            &staff_token(&ctx.lecturer),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let rates = body["data"].as_array().unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0]["report_date"], "2024-03-04");
    assert_eq!(rates[0]["present_students"], 3);
    assert_eq!(rates[0]["total_students"], 10);
    assert_eq!(rates[0]["attendance_percentage"], 30.0);

    // Date windows exclude the session.
    let resp = app
        .clone()
        .oneshot(get_request(
            "/api/reports/attendance-rates?start_date=2024-04-01",
            &staff_token(&ctx.lecturer),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn students_cannot_read_reports() {
    let (app, state) = make_test_app().await;
    let _ctx = seed(state.db()).await;

    let (token, _) = generate_jwt("S1000", Role::Student);
    let resp = app
        .clone()
        .oneshot(get_request("/api/reports/attendance-rates", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn at_risk_listing_is_admin_only() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let resp = app
        .clone()
        .oneshot(get_request(
            "/api/reports/at-risk-students",
            &staff_token(&ctx.lecturer),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Every enrolled student has zero presence rows, so all ten are at risk.
    let resp = app
        .clone()
        .oneshot(get_request(
            "/api/reports/at-risk-students",
            &staff_token(&ctx.admin),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
#[serial]
async fn day_roster_merges_presence_and_override_flags() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    Record::set_presence(state.db(), ctx.section.section_id, "S1000", d, true)
        .await
        .unwrap();

    let uri = format!(
        "/api/reports/sections/{}/days/2024-03-04",
        ctx.section.section_id
    );
    let resp = app
        .clone()
        .oneshot(get_request(&uri, &staff_token(&ctx.lecturer)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let roster = body["data"].as_array().unwrap();
    assert_eq!(roster.len(), 10);
    let present: Vec<_> = roster.iter().filter(|e| e["present"] == true).collect();
    assert_eq!(present.len(), 1);
    assert_eq!(present[0]["student_id"], "S1000");
    assert_eq!(present[0]["manual_override"], true);
}

#[tokio::test]
#[serial]
async fn dashboard_summary_counts_entities() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let resp = app
        .clone()
        .oneshot(get_request(
            "/api/reports/dashboard-summary",
            &staff_token(&ctx.admin),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["total_students"], 10);
    assert_eq!(body["data"]["total_lecturers"], 2);
    assert_eq!(body["data"]["total_courses"], 1);
    assert_eq!(body["data"]["total_sections"], 1);
}

#[tokio::test]
#[serial]
async fn rates_scope_rejects_foreign_sections() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;
    let db = state.db();

    course::Model::create(db, "DBS202", "Database Systems")
        .await
        .unwrap();
    let other = lecturer::Model::create(db, "Tan Mei Ling", "tan@test.com", "password", false)
        .await
        .unwrap();
    let other_section = section::Model::create(db, "DBS202-A", "DBS202", other.lecturer_id)
        .await
        .unwrap();

    let uri = format!(
        "/api/reports/attendance-rates?section_id={}",
        other_section.section_id
    );
    let resp = app
        .clone()
        .oneshot(get_request(&uri, &staff_token(&ctx.lecturer)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
