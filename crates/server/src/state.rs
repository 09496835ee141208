//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{AccountStore, PgAccountStore, PgPostStore, PostStore};

/// Application state shared across all handlers.
///
/// Cheap to clone. The stores are trait objects so tests can run the full
/// router against in-memory stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    posts: Arc<dyn PostStore>,
    accounts: Arc<dyn AccountStore>,
}

impl AppState {
    /// Create application state from explicit stores.
    #[must_use]
    pub fn new(posts: Arc<dyn PostStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { posts, accounts }),
        }
    }

    /// Application state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgPostStore::new(pool.clone())),
            Arc::new(PgAccountStore::new(pool)),
        )
    }

    /// Get the post store.
    #[must_use]
    pub fn posts(&self) -> &dyn PostStore {
        self.inner.posts.as_ref()
    }

    /// Get the account store.
    #[must_use]
    pub fn accounts(&self) -> &dyn AccountStore {
        self.inner.accounts.as_ref()
    }
}
