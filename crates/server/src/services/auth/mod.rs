//! Authentication service.
//!
//! Owns password hashing and verification for admin accounts. The account
//! store only ever sees Argon2id PHC strings.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use vertebra_core::{AccountId, Username};

use crate::db::{AccountStore, RepositoryError};
use crate::models::Account;

/// Minimum password length for accounts created through the admin panel or CLI.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash verified when the username is unknown, so a miss costs the same as a
/// wrong password.
static TIMING_GUARD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("vertebra-timing-guard").ok());

/// Authentication service.
///
/// Handles login, account creation and account deletion on top of an
/// [`AccountStore`].
pub struct AuthService<'a> {
    accounts: &'a dyn AccountStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(accounts: &'a dyn AccountStore) -> Self {
        Self { accounts }
    }

    /// Login with username and password.
    ///
    /// An unparseable username, an unknown username and a wrong password all
    /// produce the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair does not match an account.
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let Ok(username) = Username::parse(username) else {
            burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        let Some((account, password_hash)) = self.accounts.find_by_username(&username).await?
        else {
            burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(account)
    }

    /// Create an account after checking the username and password policy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is malformed.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;

        self.insert_account(&username, password).await
    }

    /// Create an account without applying the password policy.
    ///
    /// Used by the first-run seed, which installs a fixed pair.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_account`], minus `WeakPassword`.
    pub async fn create_account_unchecked(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let username = Username::parse(username)?;

        self.insert_account(&username, password).await
    }

    /// Delete `target` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SelfDeletion` if `actor == target`.
    /// Returns `AuthError::AccountNotFound` if the target does not exist.
    pub async fn delete_account(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<(), AuthError> {
        if actor == target {
            return Err(AuthError::SelfDeletion);
        }

        self.accounts.delete(target).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::AccountNotFound,
            other => AuthError::Repository(other),
        })
    }

    /// All accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AuthError> {
        Ok(self.accounts.list().await?)
    }

    async fn insert_account(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<Account, AuthError> {
        let password_hash = hash_password(password)?;

        self.accounts
            .insert(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

fn burn_verification(password: &str) {
    if let Some(hash) = TIMING_GUARD_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}
