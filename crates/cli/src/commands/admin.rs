//! Admin account commands.

use std::fmt::Write as _;

use vertebra_cms::db::AccountStore;
use vertebra_cms::models::Account;
use vertebra_cms::services::auth::AuthService;

use super::CommandError;

/// Create an admin account, applying the username and password policy.
///
/// # Errors
///
/// Returns `CommandError::Auth` if validation fails or the username is taken.
pub async fn create(
    accounts: &dyn AccountStore,
    username: &str,
    password: &str,
) -> Result<Account, CommandError> {
    tracing::info!("Creating admin account: {}", username);

    let account = AuthService::new(accounts)
        .create_account(username, password)
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Username: {}",
        account.id,
        account.username
    );

    Ok(account)
}

/// Render all admin accounts as a plain-text table.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the account store fails.
pub async fn list(accounts: &dyn AccountStore) -> Result<String, CommandError> {
    let accounts = AuthService::new(accounts).list_accounts().await?;
    Ok(format_accounts(&accounts))
}

fn format_accounts(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No admin accounts.".to_string();
    }

    let width = accounts
        .iter()
        .map(|a| a.username.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("USERNAME".len());

    let mut out = format!("{:>5}  {:<width$}  CREATED", "ID", "USERNAME");
    for account in accounts {
        let _ = write!(
            out,
            "\n{:>5}  {:<width$}  {}",
            account.id,
            account.username.as_str(),
            account.created_at.format("%Y-%m-%d %H:%M UTC"),
        );
    }
    out
}
