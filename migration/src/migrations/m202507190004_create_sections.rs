use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202507190004_create_sections"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("sections"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("section_id")).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("section_name")).string_len(100).not_null())
                    .col(ColumnDef::new(Alias::new("course_code")).string_len(20).not_null())
                    .col(ColumnDef::new(Alias::new("lecturer_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sections_course_code")
                            .from(Alias::new("sections"), Alias::new("course_code"))
                            .to(Alias::new("courses"), Alias::new("course_code"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sections_lecturer_id")
                            .from(Alias::new("sections"), Alias::new("lecturer_id"))
                            .to(Alias::new("lecturers"), Alias::new("lecturer_id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("sections")).to_owned())
            .await
    }
}
