use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, QueryOrder, Set, SqlErr};
use uuid::Uuid;

use super::attendance_token::{self, TokenError};
use super::{section, student};

/// A stored presence record. Absence is never stored; it is derived by the
/// reporting queries from the sessions a section held.
///
/// `token_id` is non-null if and only if the record came from a QR scan.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub record_id: i64,
    pub student_id: String,
    pub section_id: i64,
    pub token_id: Option<i64>,
    pub session_id: String,
    pub attended_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::StudentId"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::SectionId"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::attendance_token::Entity",
        from = "Column::TokenId",
        to = "super::attendance_token::Column::TokenId"
    )]
    Token,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Token.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Result of a scan that passed validation.
#[derive(Debug)]
pub enum ScanOutcome {
    /// A new presence record was written.
    Recorded(Model),
    /// The student already has a record for this session. Not an error: the
    /// duplicate scan is acknowledged and nothing is written.
    AlreadyRecorded,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("QR code not found")]
    TokenNotFound,
    /// Carries the stale token so callers can report which course/session the
    /// scan was for.
    #[error("QR code has expired")]
    TokenExpired { token: attendance_token::Model },
    #[error("section not found")]
    SectionNotFound,
    #[error("section does not belong to the QR code's course")]
    CourseMismatch,
    #[error("student is not enrolled in the QR code's course")]
    NotEnrolled,
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl From<TokenError> for ScanError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NotFound => ScanError::TokenNotFound,
            TokenError::Expired { token } => ScanError::TokenExpired { token },
            TokenError::Db(e) => ScanError::Db(e),
        }
    }
}

/// Result of a manual override request.
#[derive(Debug)]
pub enum OverrideOutcome {
    MarkedPresent(Model),
    AlreadyPresent,
    AlreadyAbsent,
    Removed,
}

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    /// Scan-sourced records are evidence and cannot be retracted manually.
    #[error("cannot mark QR-scanned attendance as absent")]
    CannotOverrideScanned,
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl Model {
    /// Records a QR scan for `student_id` against `section_id`.
    ///
    /// Validation order: token exists → token unexpired → section exists →
    /// section belongs to the token's course → student enrolled in that
    /// course. A second scan within the same session returns
    /// [`ScanOutcome::AlreadyRecorded`]; the unique (student, session) index
    /// turns a lost race between concurrent scans into the same outcome.
    pub async fn record_scan(
        db: &DatabaseConnection,
        student_id: &str,
        section_id: i64,
        qr_string: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        let token = attendance_token::Model::validate(db, qr_string, now).await?;

        let section = section::Entity::find_by_id(section_id)
            .one(db)
            .await?
            .ok_or(ScanError::SectionNotFound)?;

        if section.course_code != token.course_code {
            return Err(ScanError::CourseMismatch);
        }

        if !student::Model::is_enrolled_in_course(db, student_id, &token.course_code).await? {
            return Err(ScanError::NotEnrolled);
        }

        if Self::has_attended_session(db, student_id, &token.session_id).await? {
            return Ok(ScanOutcome::AlreadyRecorded);
        }

        let insert = ActiveModel {
            student_id: Set(student_id.to_owned()),
            section_id: Set(section_id),
            token_id: Set(Some(token.token_id)),
            session_id: Set(token.session_id.clone()),
            attended_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await;

        match insert {
            Ok(record) => Ok(ScanOutcome::Recorded(record)),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    tracing::warn!(
                        student_id,
                        session_id = %token.session_id,
                        "duplicate attendance insert lost the race; treating as already recorded"
                    );
                    Ok(ScanOutcome::AlreadyRecorded)
                }
                _ => Err(ScanError::Db(err)),
            },
        }
    }

    /// Manually sets a student's presence for `section_id` on `date`.
    ///
    /// Marking present inserts a record with a null token reference,
    /// timestamped midday on `date` so it sorts inside that day. The date's
    /// existing session id is reused when any record for the section already
    /// carries one; otherwise a fresh session id is minted. Marking absent
    /// only ever deletes override-origin records.
    pub async fn set_presence(
        db: &DatabaseConnection,
        section_id: i64,
        student_id: &str,
        date: NaiveDate,
        present: bool,
    ) -> Result<OverrideOutcome, OverrideError> {
        let day_start = date.and_hms_opt(0, 0, 0).expect("valid wall-clock time").and_utc();
        let day_end = day_start + Duration::days(1);

        let existing = Entity::find()
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AttendedAt.gte(day_start))
            .filter(Column::AttendedAt.lt(day_end))
            .one(db)
            .await?;

        if present {
            if existing.is_some() {
                return Ok(OverrideOutcome::AlreadyPresent);
            }

            let session_on_date = Entity::find()
                .filter(Column::SectionId.eq(section_id))
                .filter(Column::AttendedAt.gte(day_start))
                .filter(Column::AttendedAt.lt(day_end))
                .one(db)
                .await?;
            let session_id = session_on_date
                .map(|r| r.session_id)
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            let midday = date.and_hms_opt(12, 0, 0).expect("valid wall-clock time").and_utc();
            let now = Utc::now();
            let record = ActiveModel {
                student_id: Set(student_id.to_owned()),
                section_id: Set(section_id),
                token_id: Set(None),
                session_id: Set(session_id),
                attended_at: Set(midday),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;

            return Ok(OverrideOutcome::MarkedPresent(record));
        }

        match existing {
            None => Ok(OverrideOutcome::AlreadyAbsent),
            Some(record) if record.token_id.is_some() => Err(OverrideError::CannotOverrideScanned),
            Some(record) => {
                Entity::delete_by_id(record.record_id).exec(db).await?;
                Ok(OverrideOutcome::Removed)
            }
        }
    }

    pub async fn has_attended_session(
        db: &DatabaseConnection,
        student_id: &str,
        session_id: &str,
    ) -> Result<bool, DbErr> {
        let hit = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SessionId.eq(session_id))
            .one(db)
            .await?;
        Ok(hit.is_some())
    }

    /// Records for a section with the student rows joined in, newest first.
    pub async fn for_section(
        db: &DatabaseConnection,
        section_id: i64,
    ) -> Result<Vec<(Model, Option<student::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::SectionId.eq(section_id))
            .order_by_desc(Column::AttendedAt)
            .find_also_related(student::Entity)
            .all(db)
            .await
    }

    /// Records for a session in scan order.
    pub async fn for_session(
        db: &DatabaseConnection,
        session_id: &str,
    ) -> Result<Vec<(Model, Option<student::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::AttendedAt)
            .find_also_related(student::Entity)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{attendance_token, course, lecturer, section, section_student, student};
    use crate::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    struct Fixture {
        section: section::Model,
    }

    async fn seed(db: &DatabaseConnection) -> Fixture {
        course::Model::create(db, "NET301", "Computer Networks")
            .await
            .unwrap();
        let lect = lecturer::Model::create(db, "Aminah Yusof", "aminah@uni.test", "password", false)
            .await
            .unwrap();
        let sec = section::Model::create(db, "NET301-A", "NET301", lect.lecturer_id)
            .await
            .unwrap();

        for (id, name, email) in [
            ("S1001", "Lee Wei", "lee@uni.test"),
            ("S1002", "Nur Aisyah", "nur@uni.test"),
        ] {
            student::Model::create(db, id, name, email, "password")
                .await
                .unwrap();
            section_student::Model::enroll(db, sec.section_id, id)
                .await
                .unwrap();
        }

        Fixture { section: sec }
    }

    async fn record_count(db: &DatabaseConnection) -> u64 {
        Entity::find().count(db).await.unwrap()
    }

    #[tokio::test]
    async fn duplicate_scans_store_exactly_one_record() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let token = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();

        let first =
            Model::record_scan(&db, "S1001", fx.section.section_id, &token.qr_string, Utc::now())
                .await
                .unwrap();
        let record = match first {
            ScanOutcome::Recorded(r) => r,
            ScanOutcome::AlreadyRecorded => panic!("first scan must insert"),
        };
        assert_eq!(record.token_id, Some(token.token_id));
        assert_eq!(record.session_id, token.session_id);

        let second =
            Model::record_scan(&db, "S1001", fx.section.section_id, &token.qr_string, Utc::now())
                .await
                .unwrap();
        assert!(matches!(second, ScanOutcome::AlreadyRecorded));
        assert_eq!(record_count(&db).await, 1);
    }

    #[tokio::test]
    async fn reissued_token_in_same_session_does_not_double_count() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let first = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();
        let reissued =
            attendance_token::Model::issue(&db, "NET301", None, Some(first.session_id.clone()))
                .await
                .unwrap();

        Model::record_scan(&db, "S1001", fx.section.section_id, &first.qr_string, Utc::now())
            .await
            .unwrap();
        let outcome =
            Model::record_scan(&db, "S1001", fx.section.section_id, &reissued.qr_string, Utc::now())
                .await
                .unwrap();

        assert!(matches!(outcome, ScanOutcome::AlreadyRecorded));
        assert_eq!(record_count(&db).await, 1);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_with_its_details() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let token = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();

        let late = token.expires_at + Duration::milliseconds(1);
        match Model::record_scan(&db, "S1001", fx.section.section_id, &token.qr_string, late).await
        {
            Err(ScanError::TokenExpired { token: t }) => {
                assert_eq!(t.course_code, "NET301");
            }
            other => panic!("expected TokenExpired, got {other:?}"),
        }
        assert_eq!(record_count(&db).await, 0);
    }

    #[tokio::test]
    async fn scan_against_wrong_course_section_is_rejected() {
        let db = setup_test_db().await;
        let _fx = seed(&db).await;
        course::Model::create(&db, "DBS202", "Database Systems")
            .await
            .unwrap();
        let other_lect =
            lecturer::Model::create(&db, "Tan Mei Ling", "tan@uni.test", "password", false)
                .await
                .unwrap();
        let other_section =
            section::Model::create(&db, "DBS202-A", "DBS202", other_lect.lecturer_id)
                .await
                .unwrap();

        let token = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();

        let outcome = Model::record_scan(
            &db,
            "S1001",
            other_section.section_id,
            &token.qr_string,
            Utc::now(),
        )
        .await;
        assert!(matches!(outcome, Err(ScanError::CourseMismatch)));

        let outcome =
            Model::record_scan(&db, "S1001", 9999, &token.qr_string, Utc::now()).await;
        assert!(matches!(outcome, Err(ScanError::SectionNotFound)));
    }

    #[tokio::test]
    async fn unenrolled_student_is_rejected() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        student::Model::create(&db, "S2001", "Outsider", "outsider@uni.test", "password")
            .await
            .unwrap();
        let token = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();

        let outcome =
            Model::record_scan(&db, "S2001", fx.section.section_id, &token.qr_string, Utc::now())
                .await;
        assert!(matches!(outcome, Err(ScanError::NotEnrolled)));
    }

    #[tokio::test]
    async fn unknown_qr_string_is_rejected() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;

        let outcome =
            Model::record_scan(&db, "S1001", fx.section.section_id, "bogus", Utc::now()).await;
        assert!(matches!(outcome, Err(ScanError::TokenNotFound)));
    }

    #[tokio::test]
    async fn manual_mark_present_inserts_once_with_null_token() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let outcome = Model::set_presence(&db, fx.section.section_id, "S1001", date, true)
            .await
            .unwrap();
        let record = match outcome {
            OverrideOutcome::MarkedPresent(r) => r,
            other => panic!("expected MarkedPresent, got {other:?}"),
        };
        assert_eq!(record.token_id, None);
        assert_eq!(
            record.attended_at,
            date.and_hms_opt(12, 0, 0).unwrap().and_utc()
        );

        let again = Model::set_presence(&db, fx.section.section_id, "S1001", date, true)
            .await
            .unwrap();
        assert!(matches!(again, OverrideOutcome::AlreadyPresent));
        assert_eq!(record_count(&db).await, 1);
    }

    #[tokio::test]
    async fn manual_mark_present_joins_the_dates_existing_session() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let token = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();
        let now = Utc::now();
        Model::record_scan(&db, "S1001", fx.section.section_id, &token.qr_string, now)
            .await
            .unwrap();

        let outcome =
            Model::set_presence(&db, fx.section.section_id, "S1002", now.date_naive(), true)
                .await
                .unwrap();
        match outcome {
            OverrideOutcome::MarkedPresent(r) => assert_eq!(r.session_id, token.session_id),
            other => panic!("expected MarkedPresent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn scanned_records_cannot_be_overridden_to_absent() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let token = attendance_token::Model::issue(&db, "NET301", None, None)
            .await
            .unwrap();
        let now = Utc::now();
        Model::record_scan(&db, "S1001", fx.section.section_id, &token.qr_string, now)
            .await
            .unwrap();

        let outcome =
            Model::set_presence(&db, fx.section.section_id, "S1001", now.date_naive(), false)
                .await;
        assert!(matches!(outcome, Err(OverrideError::CannotOverrideScanned)));
        assert_eq!(record_count(&db).await, 1);
    }

    #[tokio::test]
    async fn manual_records_can_be_retracted() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        Model::set_presence(&db, fx.section.section_id, "S1001", date, true)
            .await
            .unwrap();
        let removed = Model::set_presence(&db, fx.section.section_id, "S1001", date, false)
            .await
            .unwrap();
        assert!(matches!(removed, OverrideOutcome::Removed));
        assert_eq!(record_count(&db).await, 0);

        let again = Model::set_presence(&db, fx.section.section_id, "S1001", date, false)
            .await
            .unwrap();
        assert!(matches!(again, OverrideOutcome::AlreadyAbsent));
    }
}
