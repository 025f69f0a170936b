use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// Reads `DATABASE_URL` from the environment (a `.env` file is honored when
/// present) and builds a bounded pool. Exhaustion blocks callers up to the
/// configured acquire timeout rather than failing immediately.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    // Load environment variables from a .env file, if one exists.
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&database_url)
        .await?;

    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// Applies the embedded schema and stored-procedure migrations, ensuring the
/// database is up-to-date when the application starts.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root.
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
