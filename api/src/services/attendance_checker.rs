//! Daily low-attendance check.
//!
//! Walks every student, derives their reconciled history, and pushes a
//! warning notification when their attendance percentage drops below the
//! threshold. One student's failure never aborts the batch.

use db::models::push_subscription::UserKind;
use db::models::student;
use db::reporting::{self, AttendanceStatus};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::time::Duration;
use util::state::AppState;

use super::push::{NotificationPayload, PushService};

/// Attendance percentage below which a student is warned.
pub const LOW_ATTENDANCE_THRESHOLD: f64 = 70.0;

/// Runs one pass over all students, notifying those below the threshold.
pub async fn run_daily_check(db: &DatabaseConnection) {
    tracing::info!("Running daily attendance check");

    let students = match student::Entity::find().all(db).await {
        Ok(students) => students,
        Err(e) => {
            tracing::error!(error = %e, "daily attendance check could not load students");
            return;
        }
    };

    for s in students {
        if let Err(e) = check_student(db, &s).await {
            // Isolate per-student failures; the batch continues.
            tracing::warn!(error = %e, student_id = %s.student_id, "attendance check failed for student");
        }
    }

    tracing::info!("Daily attendance check completed");
}

async fn check_student(db: &DatabaseConnection, s: &student::Model) -> Result<(), sea_orm::DbErr> {
    let history = reporting::student_history(db, &s.student_id).await?;
    if history.is_empty() {
        return Ok(());
    }

    let total = history.len() as f64;
    let present = history
        .iter()
        .filter(|h| h.status == AttendanceStatus::Present)
        .count() as f64;
    let percentage = present / total * 100.0;

    if percentage < LOW_ATTENDANCE_THRESHOLD {
        tracing::info!(
            student_id = %s.student_id,
            percentage = format!("{percentage:.1}"),
            "student below attendance threshold; sending notification"
        );
        let payload = NotificationPayload {
            title: "Attendance Warning".to_string(),
            body: format!(
                "Your attendance has dropped to {percentage:.1}%. Please ensure you attend future classes."
            ),
        };
        PushService::send_to_user(db, &s.student_id, UserKind::Student, &payload).await;
    }

    Ok(())
}

/// Spawns the periodic attendance check loop.
pub fn spawn_attendance_check_scheduler(app_state: AppState) {
    let interval = Duration::from_secs(util::config::attendance_check_interval_secs());
    let db = app_state.db_clone();

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            run_daily_check(&db).await;
        }
    });
}
