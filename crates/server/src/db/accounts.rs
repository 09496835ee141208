//! Admin account store.
//!
//! Plaintext passwords never reach this module; callers hand over an
//! Argon2id hash produced by `AuthService`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vertebra_core::{AccountId, Username};

use super::{RepositoryError, conflict_or_database};
use crate::models::Account;

/// Persistence contract for admin accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// List all accounts, oldest first.
    async fn list(&self) -> Result<Vec<Account>, RepositoryError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Find an account and its password hash by exact (case-sensitive) username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError>;

    /// Persist a new account with an already-hashed password.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn insert(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<Account, RepositoryError>;

    /// Delete an account by id.
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    async fn delete(&self, id: AccountId) -> Result<(), RepositoryError>;

    /// Number of accounts.
    async fn count(&self) -> Result<i64, RepositoryError>;
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i32,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            username,
            created_at: row.created_at,
        })
    }
}

impl CredentialRow {
    fn into_account_and_hash(self) -> Result<(Account, String), RepositoryError> {
        let account = Account::try_from(AccountRow {
            id: self.id,
            username: self.username,
            created_at: self.created_at,
        })?;
        Ok((account, self.password_hash))
    }
}

// =============================================================================
// PostgreSQL Store
// =============================================================================

/// `PostgreSQL`-backed account store.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, created_at
            FROM account
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, created_at
            FROM account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, password_hash, created_at
            FROM account
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_account_and_hash).transpose()
    }

    async fn insert(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO account (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "username"))?;

        row.try_into()
    }

    async fn delete(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM account")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
