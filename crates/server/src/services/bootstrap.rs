//! First-run seeding of the admin account.

use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::config::SeedCredentials;
use crate::db::AccountStore;
use crate::services::auth::{AuthError, AuthService};

/// Result of [`ensure_default_account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and the seed account was created.
    Created,
    /// At least one account already existed; nothing was changed.
    AlreadyInitialized,
}

/// Create the seed account if the account store is empty.
///
/// Safe to run on every start. Losing a creation race to another process
/// counts as already initialized.
///
/// # Errors
///
/// Returns `AuthError` if the store fails or the seed username is invalid.
pub async fn ensure_default_account(
    accounts: &dyn AccountStore,
    seed: &SeedCredentials,
) -> Result<SeedOutcome, AuthError> {
    if accounts.count().await? > 0 {
        return Ok(SeedOutcome::AlreadyInitialized);
    }

    let auth = AuthService::new(accounts);
    match auth
        .create_account_unchecked(&seed.username, seed.password.expose_secret())
        .await
    {
        Ok(account) => {
            info!(account_id = %account.id, username = %account.username, "Seeded admin account");
            if seed.is_default() {
                warn!(
                    "Default admin credentials (admin/admin) are active. Change them immediately."
                );
            }
            Ok(SeedOutcome::Created)
        }
        Err(AuthError::UserAlreadyExists) => Ok(SeedOutcome::AlreadyInitialized),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::db::memory::MemoryAccountStore;

    #[tokio::test]
    async fn test_seeds_empty_store_once() {
        let store = MemoryAccountStore::new();
        let seed = SeedCredentials::default();

        assert_eq!(
            ensure_default_account(&store, &seed).await.unwrap(),
            SeedOutcome::Created
        );
        assert_eq!(
            ensure_default_account(&store, &seed).await.unwrap(),
            SeedOutcome::AlreadyInitialized
        );
        assert_eq!(store.count().await.unwrap(), 1);

        let auth = AuthService::new(&store);
        assert!(auth.login("admin", "admin").await.is_ok());
    }

    #[tokio::test]
    async fn test_leaves_populated_store_alone() {
        let store = MemoryAccountStore::new();
        AuthService::new(&store)
            .create_account("editor", "long-enough")
            .await
            .unwrap();

        let outcome = ensure_default_account(&store, &SeedCredentials::default())
            .await
            .unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadyInitialized);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_uses_configured_credentials() {
        let store = MemoryAccountStore::new();
        let seed = SeedCredentials {
            username: "root".to_string(),
            password: SecretString::from("s3cure-enough"),
        };

        ensure_default_account(&store, &seed).await.unwrap();

        let auth = AuthService::new(&store);
        assert!(auth.login("root", "s3cure-enough").await.is_ok());
        assert!(auth.login("admin", "admin").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_seed_username_is_an_error() {
        let store = MemoryAccountStore::new();
        let seed = SeedCredentials {
            username: "has space".to_string(),
            password: SecretString::from("whatever"),
        };

        assert!(matches!(
            ensure_default_account(&store, &seed).await,
            Err(AuthError::InvalidUsername(_))
        ));
    }
}
