use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202508130007_create_push_subscriptions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("push_subscriptions"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("subscription_id")).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("user_type")).string_len(16).not_null())
                    .col(ColumnDef::new(Alias::new("user_id")).string_len(40).not_null())
                    .col(ColumnDef::new(Alias::new("endpoint")).text().not_null())
                    .col(ColumnDef::new(Alias::new("subscription")).text().not_null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_push_subscriptions_user")
                    .table(Alias::new("push_subscriptions"))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("user_type"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("push_subscriptions")).to_owned())
            .await
    }
}
