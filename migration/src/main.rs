use migration::Migrator;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() {
    let db = db_connect().await;
    Migrator::up(&db, None).await.expect("Migration failed");
    println!("Migrations applied");
}

async fn db_connect() -> sea_orm::DatabaseConnection {
    let path = util::config::database_path();
    let url = if path.starts_with("sqlite:") {
        path
    } else {
        if let Some(parent) = std::path::Path::new(&path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path}?mode=rwc")
    };
    sea_orm::Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
