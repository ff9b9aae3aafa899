use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub section_id: i64,
    pub section_name: String,
    pub course_code: String,
    pub lecturer_id: i64,
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
    #[sea_orm(
        belongs_to = "super::lecturer::Entity",
        from = "Column::LecturerId",
        to = "super::lecturer::Column::LecturerId"
    )]
    Lecturer,
    #[sea_orm(has_many = "super::section_student::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::lecturer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lecturer.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
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
        section_name: &str,
        course_code: &str,
        lecturer_id: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            section_name: Set(section_name.to_owned()),
            course_code: Set(course_code.to_owned()),
            lecturer_id: Set(lecturer_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// All sections taught by `lecturer_id`.
    pub async fn taught_by(
        db: &DatabaseConnection,
        lecturer_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::LecturerId.eq(lecturer_id))
            .all(db)
            .await
    }

    /// Whether `lecturer_id` teaches any section of `course_code`.
    pub async fn lecturer_teaches_course(
        db: &DatabaseConnection,
        lecturer_id: i64,
        course_code: &str,
    ) -> Result<bool, DbErr> {
        let hit = Entity::find()
            .filter(Column::LecturerId.eq(lecturer_id))
            .filter(Column::CourseCode.eq(course_code))
            .one(db)
            .await?;
        Ok(hit.is_some())
    }

    /// Whether `lecturer_id` teaches the section identified by `section_id`.
    pub async fn lecturer_owns_section(
        db: &DatabaseConnection,
        lecturer_id: i64,
        section_id: i64,
    ) -> Result<bool, DbErr> {
        let hit = Entity::find()
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::LecturerId.eq(lecturer_id))
            .one(db)
            .await?;
        Ok(hit.is_some())
    }
}
