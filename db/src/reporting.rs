//! Read-time attendance reporting.
//!
//! The store only holds presence rows. Everything else here is derived on
//! read: "a session occurred on date D for section S" means some enrolled
//! student has a record for that (section, calendar date), and a student's
//! absence is the set difference between those session dates and the dates
//! the student attended. A day on which no enrolled student has any record is
//! not a session and produces no rows anywhere.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QuerySelect,
};
use serde::Serialize;

use crate::models::{attendance_record, course, lecturer, section, section_student, student};

/// Presence-rows / distinct-enrolled-sections threshold below which a student
/// is listed as at risk. This is a coarser proxy than the per-session
/// percentage used by the daily check; the two are intentionally separate
/// metrics.
pub const AT_RISK_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One day of a student's reconciled timeline.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub course_code: String,
    pub course_name: String,
    pub section_id: i64,
    pub section_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub attended_at: Option<DateTime<Utc>>,
}

/// Aggregate attendance for one section on one day.
#[derive(Debug, Clone, Serialize)]
pub struct SectionDayRate {
    pub report_date: NaiveDate,
    pub section_id: i64,
    pub section_name: String,
    pub course_code: String,
    pub course_name: String,
    pub present_students: i64,
    pub total_students: i64,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtRiskStudent {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub presence_records: i64,
    pub enrolled_sections: i64,
}

/// One enrolled student's standing in a section/day roster.
#[derive(Debug, Clone, Serialize)]
pub struct DayRosterEntry {
    pub student_id: String,
    pub student_name: String,
    pub present: bool,
    pub manual_override: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_students: u64,
    pub total_lecturers: u64,
    pub total_courses: u64,
    pub total_sections: u64,
}

/// Reconciles a student's full Present/Absent timeline, newest date first.
///
/// A session date counts for the student's sections whether or not the
/// student attended; which students produced the rows does not matter. A
/// student with no enrollments has no derivable sessions and gets an empty
/// timeline.
pub async fn student_history(
    db: &DatabaseConnection,
    student_id: &str,
) -> Result<Vec<HistoryEntry>, DbErr> {
    let section_ids = section_student::Model::section_ids_for_student(db, student_id).await?;
    if section_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sections = section::Entity::find()
        .filter(section::Column::SectionId.is_in(section_ids.clone()))
        .all(db)
        .await?;
    let course_codes: Vec<String> = sections.iter().map(|s| s.course_code.clone()).collect();
    let course_names: HashMap<String, String> = course::Entity::find()
        .filter(course::Column::CourseCode.is_in(course_codes))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.course_code, c.course_name))
        .collect();
    let section_info: HashMap<i64, &section::Model> =
        sections.iter().map(|s| (s.section_id, s)).collect();

    // Sessions that occurred for any enrolled student, per (section, date).
    let held: Vec<(i64, DateTime<Utc>)> = attendance_record::Entity::find()
        .select_only()
        .column(attendance_record::Column::SectionId)
        .column(attendance_record::Column::AttendedAt)
        .filter(attendance_record::Column::SectionId.is_in(section_ids.clone()))
        .into_tuple()
        .all(db)
        .await?;
    let session_dates: BTreeSet<(i64, NaiveDate)> = held
        .into_iter()
        .map(|(section_id, at)| (section_id, at.date_naive()))
        .collect();

    // The sessions this student attended.
    let own: Vec<(i64, DateTime<Utc>)> = attendance_record::Entity::find()
        .select_only()
        .column(attendance_record::Column::SectionId)
        .column(attendance_record::Column::AttendedAt)
        .filter(attendance_record::Column::StudentId.eq(student_id))
        .filter(attendance_record::Column::SectionId.is_in(section_ids))
        .into_tuple()
        .all(db)
        .await?;
    let mut attended: HashMap<(i64, NaiveDate), DateTime<Utc>> = HashMap::new();
    for (section_id, at) in own {
        attended
            .entry((section_id, at.date_naive()))
            .and_modify(|existing| {
                if at < *existing {
                    *existing = at;
                }
            })
            .or_insert(at);
    }

    let mut history: Vec<HistoryEntry> = session_dates
        .into_iter()
        .filter_map(|(section_id, date)| {
            let sec = section_info.get(&section_id)?;
            let attended_at = attended.get(&(section_id, date)).copied();
            Some(HistoryEntry {
                course_code: sec.course_code.clone(),
                course_name: course_names
                    .get(&sec.course_code)
                    .cloned()
                    .unwrap_or_default(),
                section_id,
                section_name: sec.section_name.clone(),
                date,
                status: if attended_at.is_some() {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                },
                attended_at,
            })
        })
        .collect();

    history.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.course_code.cmp(&b.course_code))
            .then_with(|| a.section_name.cmp(&b.section_name))
    });
    Ok(history)
}

/// Per (section, day) rollups for the given sections, newest day first.
///
/// `present_students` counts distinct students with a record on that day;
/// `total_students` is the section's current enrollment count, not filtered
/// by date. Sections with zero enrollment report a percentage of 0.
pub async fn section_day_rates(
    db: &DatabaseConnection,
    section_ids: &[i64],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    course_code: Option<&str>,
) -> Result<Vec<SectionDayRate>, DbErr> {
    if section_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut sections_query = section::Entity::find()
        .filter(section::Column::SectionId.is_in(section_ids.to_vec()));
    if let Some(code) = course_code {
        sections_query = sections_query.filter(section::Column::CourseCode.eq(code));
    }
    let sections = sections_query.all(db).await?;
    if sections.is_empty() {
        return Ok(Vec::new());
    }

    let course_names: HashMap<String, String> = course::Entity::find()
        .filter(
            course::Column::CourseCode
                .is_in(sections.iter().map(|s| s.course_code.clone()).collect::<Vec<_>>()),
        )
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.course_code, c.course_name))
        .collect();
    let section_info: HashMap<i64, &section::Model> =
        sections.iter().map(|s| (s.section_id, s)).collect();
    let filtered_ids: Vec<i64> = sections.iter().map(|s| s.section_id).collect();

    let rows: Vec<(i64, String, DateTime<Utc>)> = attendance_record::Entity::find()
        .select_only()
        .column(attendance_record::Column::SectionId)
        .column(attendance_record::Column::StudentId)
        .column(attendance_record::Column::AttendedAt)
        .filter(attendance_record::Column::SectionId.is_in(filtered_ids.clone()))
        .into_tuple()
        .all(db)
        .await?;

    let mut present: HashMap<(i64, NaiveDate), HashSet<String>> = HashMap::new();
    for (section_id, student_id, at) in rows {
        let date = at.date_naive();
        if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
            continue;
        }
        present.entry((section_id, date)).or_default().insert(student_id);
    }

    #[derive(FromQueryResult)]
    struct EnrollCount {
        section_id: i64,
        cnt: i64,
    }
    let enrollment: HashMap<i64, i64> = section_student::Entity::find()
        .select_only()
        .column(section_student::Column::SectionId)
        .column_as(section_student::Column::StudentId.count(), "cnt")
        .filter(section_student::Column::SectionId.is_in(filtered_ids))
        .group_by(section_student::Column::SectionId)
        .into_model::<EnrollCount>()
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.section_id, r.cnt))
        .collect();

    let mut reports: Vec<SectionDayRate> = present
        .into_iter()
        .filter_map(|((section_id, date), students)| {
            let sec = section_info.get(&section_id)?;
            let present_students = students.len() as i64;
            let total_students = enrollment.get(&section_id).copied().unwrap_or(0);
            let attendance_percentage = if total_students > 0 {
                (present_students as f64 / total_students as f64) * 100.0
            } else {
                0.0
            };
            Some(SectionDayRate {
                report_date: date,
                section_id,
                section_name: sec.section_name.clone(),
                course_code: sec.course_code.clone(),
                course_name: course_names
                    .get(&sec.course_code)
                    .cloned()
                    .unwrap_or_default(),
                present_students,
                total_students,
                attendance_percentage,
            })
        })
        .collect();

    reports.sort_by(|a, b| {
        b.report_date
            .cmp(&a.report_date)
            .then_with(|| a.course_code.cmp(&b.course_code))
            .then_with(|| a.section_name.cmp(&b.section_name))
    });
    Ok(reports)
}

/// Students whose presence-rows / enrolled-sections ratio is below
/// [`AT_RISK_RATIO`]. Only enrolled students are considered; a student with
/// no presence rows at all has ratio 0 and is flagged.
pub async fn at_risk_students(db: &DatabaseConnection) -> Result<Vec<AtRiskStudent>, DbErr> {
    #[derive(FromQueryResult)]
    struct CountRow {
        student_id: String,
        cnt: i64,
    }

    let enrolled: Vec<CountRow> = section_student::Entity::find()
        .select_only()
        .column(section_student::Column::StudentId)
        .column_as(section_student::Column::SectionId.count(), "cnt")
        .group_by(section_student::Column::StudentId)
        .into_model::<CountRow>()
        .all(db)
        .await?;

    let presence: HashMap<String, i64> = attendance_record::Entity::find()
        .select_only()
        .column(attendance_record::Column::StudentId)
        .column_as(attendance_record::Column::RecordId.count(), "cnt")
        .group_by(attendance_record::Column::StudentId)
        .into_model::<CountRow>()
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.student_id, r.cnt))
        .collect();

    let mut flagged: HashMap<String, (i64, i64)> = HashMap::new();
    for row in enrolled {
        let records = presence.get(&row.student_id).copied().unwrap_or(0);
        if (records as f64) / (row.cnt as f64) < AT_RISK_RATIO {
            flagged.insert(row.student_id, (records, row.cnt));
        }
    }
    if flagged.is_empty() {
        return Ok(Vec::new());
    }

    let mut students: Vec<AtRiskStudent> = student::Entity::find()
        .filter(student::Column::StudentId.is_in(flagged.keys().cloned().collect::<Vec<_>>()))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|s| {
            let (presence_records, enrolled_sections) = flagged.get(&s.student_id).copied()?;
            Some(AtRiskStudent {
                student_id: s.student_id,
                name: s.name,
                email: s.email,
                presence_records,
                enrolled_sections,
            })
        })
        .collect();
    students.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    Ok(students)
}

/// The full enrolled roster of a section for one day, with presence and
/// origin flags merged in. An empty roster yields an empty report.
pub async fn section_day_roster(
    db: &DatabaseConnection,
    section_id: i64,
    date: NaiveDate,
) -> Result<Vec<DayRosterEntry>, DbErr> {
    let roster = section_student::Entity::find()
        .filter(section_student::Column::SectionId.eq(section_id))
        .find_also_related(student::Entity)
        .all(db)
        .await?;
    if roster.is_empty() {
        return Ok(Vec::new());
    }

    let day_start = date.and_hms_opt(0, 0, 0).expect("valid wall-clock time").and_utc();
    let day_end = day_start + chrono::Duration::days(1);
    let present: HashMap<String, Option<i64>> = attendance_record::Entity::find()
        .filter(attendance_record::Column::SectionId.eq(section_id))
        .filter(attendance_record::Column::AttendedAt.gte(day_start))
        .filter(attendance_record::Column::AttendedAt.lt(day_end))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.student_id, r.token_id))
        .collect();

    let mut entries: Vec<DayRosterEntry> = roster
        .into_iter()
        .map(|(edge, stu)| {
            let token_id = present.get(&edge.student_id);
            DayRosterEntry {
                student_name: stu.map(|s| s.name).unwrap_or_default(),
                present: token_id.is_some(),
                // A manual override is a presence row without a QR token.
                manual_override: matches!(token_id, Some(None)),
                student_id: edge.student_id,
            }
        })
        .collect();
    entries.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    Ok(entries)
}

/// Entity counts for the admin dashboard.
pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary, DbErr> {
    Ok(DashboardSummary {
        total_students: student::Entity::find().count(db).await?,
        total_lecturers: lecturer::Entity::find().count(db).await?,
        total_courses: course::Entity::find().count(db).await?,
        total_sections: section::Entity::find().count(db).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance_record::Model as Record;
    use crate::models::{course, lecturer, section, section_student, student};
    use crate::test_utils::setup_test_db;

    async fn seed_section(
        db: &DatabaseConnection,
        course_code: &str,
        section_name: &str,
    ) -> section::Model {
        if course::Model::find_by_code(db, course_code).await.unwrap().is_none() {
            course::Model::create(db, course_code, &format!("{course_code} Course"))
                .await
                .unwrap();
        }
        let lect = lecturer::Model::create(
            db,
            "Lecturer",
            &format!("{section_name}@uni.test"),
            "password",
            false,
        )
        .await
        .unwrap();
        section::Model::create(db, section_name, course_code, lect.lecturer_id)
            .await
            .unwrap()
    }

    async fn seed_student(db: &DatabaseConnection, id: &str, sections: &[i64]) {
        student::Model::create(db, id, id, &format!("{id}@uni.test"), "password")
            .await
            .unwrap();
        for sid in sections {
            section_student::Model::enroll(db, *sid, id).await.unwrap();
        }
    }

    #[tokio::test]
    async fn history_derives_absences_from_other_students_sessions() {
        let db = setup_test_db().await;
        let sec = seed_section(&db, "NET301", "NET301-A").await;
        seed_student(&db, "S1001", &[sec.section_id]).await;
        seed_student(&db, "S1002", &[sec.section_id]).await;

        let d1 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        Record::set_presence(&db, sec.section_id, "S1001", d1, true)
            .await
            .unwrap();
        Record::set_presence(&db, sec.section_id, "S1001", d2, true)
            .await
            .unwrap();

        // S1002 never attended: both session days show up as Absent.
        let history = student_history(&db, "S1002").await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|h| h.status == AttendanceStatus::Absent));
        assert!(history.iter().all(|h| h.attended_at.is_none()));
        assert_eq!(history[0].date, d2);
        assert_eq!(history[1].date, d1);

        // S1001 sees the same days as Present.
        let history = student_history(&db, "S1001").await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|h| h.status == AttendanceStatus::Present));
        assert!(history.iter().all(|h| h.attended_at.is_some()));
    }

    #[tokio::test]
    async fn history_is_empty_without_enrollments() {
        let db = setup_test_db().await;
        student::Model::create(&db, "S1001", "Loner", "loner@uni.test", "password")
            .await
            .unwrap();
        assert!(student_history(&db, "S1001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_ignores_sections_the_student_is_not_in() {
        let db = setup_test_db().await;
        let sec_a = seed_section(&db, "NET301", "NET301-A").await;
        let sec_b = seed_section(&db, "DBS202", "DBS202-A").await;
        seed_student(&db, "S1001", &[sec_a.section_id]).await;
        seed_student(&db, "S1002", &[sec_b.section_id]).await;

        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        Record::set_presence(&db, sec_b.section_id, "S1002", d, true)
            .await
            .unwrap();

        // The other section's session is invisible to S1001.
        assert!(student_history(&db, "S1001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rates_divide_by_static_enrollment() {
        let db = setup_test_db().await;
        let sec = seed_section(&db, "NET301", "NET301-A").await;
        for i in 0..10 {
            seed_student(&db, &format!("S10{i:02}"), &[sec.section_id]).await;
        }

        let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        for id in ["S1000", "S1001", "S1002"] {
            Record::set_presence(&db, sec.section_id, id, d, true)
                .await
                .unwrap();
        }

        let rates = section_day_rates(&db, &[sec.section_id], None, None, None)
            .await
            .unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].report_date, d);
        assert_eq!(rates[0].present_students, 3);
        assert_eq!(rates[0].total_students, 10);
        assert_eq!(rates[0].attendance_percentage, 30.0);
    }

    #[tokio::test]
    async fn rates_with_zero_enrollment_report_zero_percent() {
        let db = setup_test_db().await;
        let sec = seed_section(&db, "NET301", "NET301-A").await;
        // One record from a student who is not enrolled in the section.
        student::Model::create(&db, "S9999", "Ghost", "ghost@uni.test", "password")
            .await
            .unwrap();
        let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Record::set_presence(&db, sec.section_id, "S9999", d, true)
            .await
            .unwrap();

        let rates = section_day_rates(&db, &[sec.section_id], None, None, None)
            .await
            .unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].total_students, 0);
        assert_eq!(rates[0].attendance_percentage, 0.0);
    }

    #[tokio::test]
    async fn rates_respect_the_date_window_and_course_filter() {
        let db = setup_test_db().await;
        let sec = seed_section(&db, "NET301", "NET301-A").await;
        seed_student(&db, "S1001", &[sec.section_id]).await;

        let inside = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let outside = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        Record::set_presence(&db, sec.section_id, "S1001", inside, true)
            .await
            .unwrap();
        Record::set_presence(&db, sec.section_id, "S1001", outside, true)
            .await
            .unwrap();

        let rates = section_day_rates(
            &db,
            &[sec.section_id],
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()),
            None,
        )
        .await
        .unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].report_date, inside);

        let none = section_day_rates(&db, &[sec.section_id], None, None, Some("DBS202"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn at_risk_uses_the_sections_denominator() {
        let db = setup_test_db().await;
        let sec_a = seed_section(&db, "NET301", "NET301-A").await;
        let sec_b = seed_section(&db, "DBS202", "DBS202-A").await;

        // One record across two sections: ratio 0.5, flagged.
        seed_student(&db, "S1001", &[sec_a.section_id, sec_b.section_id]).await;
        // One record in one section: ratio 1.0, not flagged.
        seed_student(&db, "S1002", &[sec_a.section_id]).await;
        // Enrolled, never attended: ratio 0, flagged.
        seed_student(&db, "S1003", &[sec_a.section_id]).await;

        let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Record::set_presence(&db, sec_a.section_id, "S1001", d, true)
            .await
            .unwrap();
        Record::set_presence(&db, sec_a.section_id, "S1002", d, true)
            .await
            .unwrap();

        let flagged = at_risk_students(&db).await.unwrap();
        let ids: Vec<&str> = flagged.iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, vec!["S1001", "S1003"]);
    }

    #[tokio::test]
    async fn day_roster_merges_presence_and_origin() {
        let db = setup_test_db().await;
        let sec = seed_section(&db, "NET301", "NET301-A").await;
        seed_student(&db, "S1001", &[sec.section_id]).await;
        seed_student(&db, "S1002", &[sec.section_id]).await;
        seed_student(&db, "S1003", &[sec.section_id]).await;

        let token = crate::models::attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();
        let now = Utc::now();
        Record::record_scan(&db, "S1001", sec.section_id, &token.qr_string, now)
            .await
            .unwrap();
        Record::set_presence(&db, sec.section_id, "S1002", now.date_naive(), true)
            .await
            .unwrap();

        let roster = section_day_roster(&db, sec.section_id, now.date_naive())
            .await
            .unwrap();
        assert_eq!(roster.len(), 3);
        let by_id: HashMap<&str, &DayRosterEntry> =
            roster.iter().map(|e| (e.student_id.as_str(), e)).collect();
        assert!(by_id["S1001"].present && !by_id["S1001"].manual_override);
        assert!(by_id["S1002"].present && by_id["S1002"].manual_override);
        assert!(!by_id["S1003"].present && !by_id["S1003"].manual_override);
    }
}
