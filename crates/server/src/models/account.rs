//! Admin account domain types.

use chrono::{DateTime, Utc};

use vertebra_core::{AccountId, Username};

/// An admin account (domain type).
///
/// The password hash is deliberately not part of this type; it only leaves
/// the account store through `AccountStore::find_by_username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login name (unique, case-sensitive).
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
