//! Seeds the database with an initial admin lecturer and a small demo
//! timetable so a fresh install has something to log into.

use db::models::{course, lecturer, section, section_student, student};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    Migrator::up(&db, None).await.expect("Migration failed");

    seed_admin(&db).await;
    seed_demo_timetable(&db).await;

    println!("Seeding complete");
}

async fn seed_admin(db: &DatabaseConnection) {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@attendance.local".into());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".into());

    if lecturer::Model::find_by_email(db, &email)
        .await
        .expect("Failed to query lecturers")
        .is_some()
    {
        println!("Admin account already present, skipping");
        return;
    }

    lecturer::Model::create(db, "System Administrator", &email, &password, true)
        .await
        .expect("Failed to create admin account");
    println!("Created admin account {email}");
}

async fn seed_demo_timetable(db: &DatabaseConnection) {
    if course::Model::find_by_code(db, "NET301")
        .await
        .expect("Failed to query courses")
        .is_some()
    {
        println!("Demo timetable already present, skipping");
        return;
    }

    course::Model::create(db, "NET301", "Computer Networks")
        .await
        .expect("Failed to create demo course");
    let lect = lecturer::Model::create(
        db,
        "Aminah Yusof",
        "aminah@attendance.local",
        "lecturer-password",
        false,
    )
    .await
    .expect("Failed to create demo lecturer");
    let sec = section::Model::create(db, "NET301-A", "NET301", lect.lecturer_id)
        .await
        .expect("Failed to create demo section");

    for (id, name) in [
        ("S1001", "Lee Wei"),
        ("S1002", "Nur Aisyah"),
        ("S1003", "Rajesh Kumar"),
    ] {
        student::Model::create(db, id, name, &format!("{}@student.local", id.to_lowercase()), "student-password")
            .await
            .expect("Failed to create demo student");
        section_student::Model::enroll(db, sec.section_id, id)
            .await
            .expect("Failed to enroll demo student");
    }

    println!("Created demo course NET301 with one section and three students");
}
