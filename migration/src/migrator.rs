use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202507150001_create_lecturers::Migration),
            Box::new(migrations::m202507150002_create_students::Migration),
            Box::new(migrations::m202507170003_create_courses::Migration),
            Box::new(migrations::m202507190004_create_sections::Migration),
            Box::new(migrations::m202507190005_create_section_students::Migration),
            Box::new(migrations::m202507200006_create_attendance_tokens::Migration),
            Box::new(migrations::m202508130007_create_push_subscriptions::Migration),
            Box::new(migrations::m202508140008_create_attendance_records::Migration),
        ]
    }
}
