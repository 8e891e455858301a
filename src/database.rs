use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type Database = Pool<Postgres>;

pub async fn create_database_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<Database, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await?;

    log::info!("Connected to database successfully");
    Ok(pool)
}

pub async fn run_migrations(pool: &Database) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations applied");
    Ok(())
}
