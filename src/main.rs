use anyhow::Context;
use dotenvy::dotenv;

use linentrack::{
    create_router,
    database::{create_database_pool, run_migrations},
    store::PgStore,
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = Config::from_env()?;

    let db = create_database_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to apply database migrations")?;

    let state = AppState::new(PgStore::new(db), config.jwt_secret.as_str());
    let app = create_router(state);

    let addr = config.socket_addr()?;
    log::info!("Linen tracking server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
