use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

/// Enrollment edge between a section and a student.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "section_students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::SectionId"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::StudentId"
    )]
    Student,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Adds the enrollment edge; returns the existing edge unchanged when the
    /// student is already enrolled.
    pub async fn enroll(
        db: &DatabaseConnection,
        section_id: i64,
        student_id: &str,
    ) -> Result<Model, DbErr> {
        if let Some(existing) = Entity::find_by_id((section_id, student_id.to_owned()))
            .one(db)
            .await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        ActiveModel {
            section_id: Set(section_id),
            student_id: Set(student_id.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    /// Removes the enrollment edge. Returns `true` when a row was deleted.
    pub async fn unenroll(
        db: &DatabaseConnection,
        section_id: i64,
        student_id: &str,
    ) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id((section_id, student_id.to_owned()))
            .exec(db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Section ids the student is enrolled in.
    pub async fn section_ids_for_student(
        db: &DatabaseConnection,
        student_id: &str,
    ) -> Result<Vec<i64>, DbErr> {
        let edges = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .all(db)
            .await?;
        Ok(edges.into_iter().map(|e| e.section_id).collect())
    }
}
