use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::path::Path;

#[tokio::main]
async fn main() {
    let path = util::config::database_path();
    if let Some(parent) = Path::new(&path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let url = format!("sqlite://{path}?mode=rwc");

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");

    Migrator::up(&db, None).await.expect("Migration failed");

    println!("Migrations applied to {path}");
}
