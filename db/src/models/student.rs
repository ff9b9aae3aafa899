use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, JoinType, QuerySelect, Set};

use super::lecturer::hash_password;

/// Represents a student in the `students` table.
///
/// The primary key is the institution-issued student number, not a surrogate id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_student::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::section_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        student_id: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Model, DbErr> {
        let password_hash = hash_password(password)?;
        let now = Utc::now();
        ActiveModel {
            student_id: Set(student_id.to_owned()),
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Email.eq(email)).one(db).await
    }

    /// Verifies a plaintext password against the stored Argon2 hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Whether the student holds an enrollment edge into any section of `course_code`.
    pub async fn is_enrolled_in_course(
        db: &DatabaseConnection,
        student_id: &str,
        course_code: &str,
    ) -> Result<bool, DbErr> {
        let hit = super::section_student::Entity::find()
            .join(JoinType::InnerJoin, super::section_student::Relation::Section.def())
            .filter(super::section_student::Column::StudentId.eq(student_id))
            .filter(super::section::Column::CourseCode.eq(course_code))
            .one(db)
            .await?;
        Ok(hit.is_some())
    }
}
