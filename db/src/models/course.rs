use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub course_id: i64,
    #[sea_orm(unique)]
    pub course_code: String,
    pub course_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section::Entity")]
    Sections,
    #[sea_orm(has_many = "super::attendance_token::Entity")]
    Tokens,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sections.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        course_code: &str,
        course_name: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            course_code: Set(course_code.to_owned()),
            course_name: Set(course_name.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_code(
        db: &DatabaseConnection,
        course_code: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseCode.eq(course_code))
            .one(db)
            .await
    }
}
