//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use vertebra_core::{AccountId, Username};

use super::Account;

/// Session-stored admin identity.
///
/// Minimal data stored server-side to identify the logged-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's username.
    pub username: Username,
}

impl From<&Account> for CurrentAdmin {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
