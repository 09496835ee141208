//! First-run seed command.
//!
//! Runs the same routine as server startup, so it is safe to repeat.

use vertebra_cms::config::SeedCredentials;
use vertebra_cms::db::AccountStore;
use vertebra_cms::services::bootstrap::{SeedOutcome, ensure_default_account};

use super::CommandError;

/// Seed the admin account from `VERTEBRA_SEED_USERNAME` / `VERTEBRA_SEED_PASSWORD`.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the store fails or the seed username is invalid.
pub async fn run(accounts: &dyn AccountStore) -> Result<(), CommandError> {
    let seed = SeedCredentials::from_env();

    match ensure_default_account(accounts, &seed).await? {
        SeedOutcome::Created => tracing::info!("Seeded admin account '{}'", seed.username),
        SeedOutcome::AlreadyInitialized => {
            tracing::info!("Admin accounts already exist; nothing to do");
        }
    }

    Ok(())
}
