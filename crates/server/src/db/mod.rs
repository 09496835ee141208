//! Persistence for posts and admin accounts.
//!
//! # Tables
//!
//! - `account` - Admin accounts (unique username, Argon2id password hash)
//! - `post` - Blog posts (unique slug)
//! - `tower_sessions.session` - Session storage, created by `PostgresStore::migrate`
//!
//! # Stores
//!
//! Handlers never see a connection pool. They talk to the [`PostStore`] and
//! [`AccountStore`] traits, implemented for `PostgreSQL` ([`PgPostStore`],
//! [`PgAccountStore`]) and in memory ([`memory`]) for tests and local runs.
//!
//! # Schema
//!
//! The schema lives in `crates/server/migrations/` and is embedded into the
//! binary; [`run_migrations`] applies it at startup and is a no-op once applied.

pub mod accounts;
pub mod memory;
pub mod posts;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::{AccountStore, PgAccountStore};
pub use posts::{PgPostStore, PostStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate username or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded schema.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history diverges
/// from the embedded files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
