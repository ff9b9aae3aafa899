use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which user table the subscription's `user_id` points into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "push_user_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserKind {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "lecturer")]
    Lecturer,
}

/// A stored Web Push subscription for one of a user's devices.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "push_subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub subscription_id: i64,
    pub user_type: UserKind,
    pub user_id: String,
    pub endpoint: String,
    /// The full subscription object as handed over by the browser.
    pub subscription: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stores a subscription, deduplicating per (user, endpoint): saving the
    /// same device twice returns the existing row.
    pub async fn save(
        db: &DatabaseConnection,
        user_id: &str,
        user_type: UserKind,
        endpoint: &str,
        subscription: &str,
    ) -> Result<Model, DbErr> {
        if let Some(existing) = Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::UserType.eq(user_type))
            .filter(Column::Endpoint.eq(endpoint))
            .one(db)
            .await?
        {
            return Ok(existing);
        }

        ActiveModel {
            user_type: Set(user_type),
            user_id: Set(user_id.to_owned()),
            endpoint: Set(endpoint.to_owned()),
            subscription: Set(subscription.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// All device subscriptions registered for a user.
    pub async fn for_user(
        db: &DatabaseConnection,
        user_id: &str,
        user_type: UserKind,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::UserType.eq(user_type))
            .all(db)
            .await
    }
}
