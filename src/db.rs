use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub type DbPool = SqlitePool;

/// Shared state for request handlers: the pool plus resolved configuration
pub struct AppState {
  pub db: DbPool,
  pub config: crate::config::EngineConfig,
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_url: &str, max_connections: u32) -> Result<DbPool, crate::error::EngineError> {
  tracing::info!(db_url, "initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .connect(db_url)
    .await?;

  run_migrations(&pool).await?;

  tracing::info!("database initialized successfully");

  Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), crate::error::EngineError> {
  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}
