//! Command implementations.

pub mod admin;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use vertebra_cms::services::auth::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema could not be applied.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Account operation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Connect to the CMS database and apply the embedded schema.
///
/// # Errors
///
/// Returns `CommandError` if the URL is missing, the connection fails, or the
/// schema cannot be applied.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("VERTEBRA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("VERTEBRA_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = vertebra_cms::db::create_pool(&SecretString::from(database_url)).await?;

    vertebra_cms::db::run_migrations(&pool).await?;

    Ok(pool)
}
