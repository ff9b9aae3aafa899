use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// Fixed slack added to every token's validity window to absorb network
/// latency between rendering the QR code and the scan reaching the server.
pub const EXPIRY_BUFFER_SECONDS: i64 = 3;

/// Default validity window when the issuer is not given one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 10;

/// A short-lived, session-scoped QR attendance token.
///
/// Many tokens may share a `session_id`: re-issuing a token mid-class keeps
/// the scans grouped under the same session.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub token_id: i64,
    #[sea_orm(unique)]
    pub qr_string: String,
    pub course_code: String,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseCode",
        to = "super::course::Column::CourseCode"
    )]
    Course,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Outcome of resolving a scanned QR string.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("QR code not found")]
    NotFound,
    /// Expired tokens still carry the row so callers can report which
    /// course/session the stale scan belonged to.
    #[error("QR code has expired")]
    Expired { token: Model },
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl Model {
    /// Issues a fresh token for `course_code`.
    ///
    /// `expires_at = now + validity + EXPIRY_BUFFER_SECONDS`. When
    /// `existing_session_id` is given the new token continues that session;
    /// otherwise a new session id is minted. Course existence is left to the
    /// foreign-key constraint.
    pub async fn issue(
        db: &DatabaseConnection,
        course_code: &str,
        validity_minutes: Option<i64>,
        existing_session_id: Option<String>,
    ) -> Result<Model, DbErr> {
        let minutes = validity_minutes.unwrap_or(DEFAULT_VALIDITY_MINUTES);
        let now = Utc::now();
        let expires_at =
            now + Duration::seconds(minutes * 60) + Duration::seconds(EXPIRY_BUFFER_SECONDS);
        let session_id = existing_session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        ActiveModel {
            qr_string: Set(Uuid::new_v4().to_string()),
            course_code: Set(course_code.to_owned()),
            session_id: Set(session_id),
            expires_at: Set(expires_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_qr_string(
        db: &DatabaseConnection,
        qr_string: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::QrString.eq(qr_string))
            .one(db)
            .await
    }

    /// Resolves `qr_string` and checks it against `now`.
    ///
    /// The window is inclusive of `expires_at` itself: only `now > expires_at`
    /// counts as expired.
    pub async fn validate(
        db: &DatabaseConnection,
        qr_string: &str,
        now: DateTime<Utc>,
    ) -> Result<Model, TokenError> {
        let token = Self::find_by_qr_string(db, qr_string)
            .await?
            .ok_or(TokenError::NotFound)?;

        if now > token.expires_at {
            return Err(TokenError::Expired { token });
        }

        Ok(token)
    }

    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Deletes the token, invalidating it immediately. Returns `true` when a
    /// row was deleted.
    pub async fn invalidate(db: &DatabaseConnection, token_id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(token_id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course;
    use crate::test_utils::setup_test_db;
    use chrono::Duration;

    #[tokio::test]
    async fn issue_applies_validity_window_and_buffer() {
        let db = setup_test_db().await;
        course::Model::create(&db, "NET301", "Computer Networks")
            .await
            .unwrap();

        let before = Utc::now();
        let token = Model::issue(&db, "NET301", Some(10), None).await.unwrap();
        let after = Utc::now();

        let lower = before + Duration::seconds(10 * 60 + EXPIRY_BUFFER_SECONDS);
        let upper = after + Duration::seconds(10 * 60 + EXPIRY_BUFFER_SECONDS);
        assert!(token.expires_at >= lower && token.expires_at <= upper);
    }

    #[tokio::test]
    async fn issue_reuses_supplied_session_id() {
        let db = setup_test_db().await;
        course::Model::create(&db, "NET301", "Computer Networks")
            .await
            .unwrap();

        let first = Model::issue(&db, "NET301", None, None).await.unwrap();
        let second = Model::issue(&db, "NET301", None, Some(first.session_id.clone()))
            .await
            .unwrap();

        assert_eq!(first.session_id, second.session_id);
        assert_ne!(first.qr_string, second.qr_string);
    }

    #[tokio::test]
    async fn validate_is_strict_about_the_boundary() {
        let db = setup_test_db().await;
        course::Model::create(&db, "NET301", "Computer Networks")
            .await
            .unwrap();
        let token = Model::issue(&db, "NET301", Some(10), None).await.unwrap();

        // One millisecond before expiry is still valid.
        let just_before = token.expires_at - Duration::milliseconds(1);
        assert!(Model::validate(&db, &token.qr_string, just_before).await.is_ok());

        // Exactly at expiry is still valid; strictly after is not.
        assert!(Model::validate(&db, &token.qr_string, token.expires_at).await.is_ok());
        let just_after = token.expires_at + Duration::milliseconds(1);
        match Model::validate(&db, &token.qr_string, just_after).await {
            Err(TokenError::Expired { token: t }) => assert_eq!(t.token_id, token.token_id),
            other => panic!("expected Expired, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn validate_reports_unknown_strings() {
        let db = setup_test_db().await;
        match Model::validate(&db, "not-a-token", Utc::now()).await {
            Err(TokenError::NotFound) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalidate_deletes_the_row() {
        let db = setup_test_db().await;
        course::Model::create(&db, "NET301", "Computer Networks")
            .await
            .unwrap();
        let token = Model::issue(&db, "NET301", None, None).await.unwrap();

        assert!(Model::invalidate(&db, token.token_id).await.unwrap());
        assert!(!Model::invalidate(&db, token.token_id).await.unwrap());
        assert!(
            Model::find_by_qr_string(&db, &token.qr_string)
                .await
                .unwrap()
                .is_none()
        );
    }
}
