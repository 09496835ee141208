//! In-memory stores.
//!
//! Same contracts as the `PostgreSQL` stores, including the unique username
//! and slug constraints, so router tests can run without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vertebra_core::{AccountId, PostId, Username};

use super::{AccountStore, PostStore, RepositoryError};
use crate::models::{Account, NewPost, Post};

#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    last_id: i32,
}

// Derived `Default` would require `T: Default`.
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Clone)]
struct AccountRecord {
    account: Account,
    password_hash: String,
}

/// Account store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    table: RwLock<Table<AccountRecord>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().map(|r| r.account.clone()).collect())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|r| r.account.id == id)
            .map(|r| r.account.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|r| &r.account.username == username)
            .map(|r| (r.account.clone(), r.password_hash.clone())))
    }

    async fn insert(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|r| &r.account.username == username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let account = Account {
            id: AccountId::new(table.next_id()),
            username: username.clone(),
            created_at: Utc::now(),
        };
        table.rows.push(AccountRecord {
            account: account.clone(),
            password_hash: password_hash.to_owned(),
        });

        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|r| r.account.id != id);
        if table.rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let table = self.table.read().await;
        i64::try_from(table.rows.len())
            .map_err(|e| RepositoryError::DataCorruption(format!("account count overflow: {e}")))
    }
}

/// Post store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    table: RwLock<Table<Post>>,
}

impl MemoryPostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError> {
        let table = self.table.read().await;
        let mut posts = table.rows.clone();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_i32().cmp(&a.id.as_i32()))
        });
        Ok(posts)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.slug.as_str() == slug).cloned())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: &NewPost) -> Result<Post, RepositoryError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|p| p.slug == post.slug) {
            return Err(RepositoryError::Conflict("slug already exists".to_owned()));
        }

        let now = Utc::now();
        let created = Post {
            id: PostId::new(table.next_id()),
            title: post.title.clone(),
            slug: post.slug.clone(),
            body: post.body.clone(),
            image: post.image.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.push(created.clone());

        Ok(created)
    }

    async fn update(&self, id: PostId, post: &NewPost) -> Result<Post, RepositoryError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|p| p.id != id && p.slug == post.slug) {
            return Err(RepositoryError::Conflict("slug already exists".to_owned()));
        }

        let existing = table
            .rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        existing.title.clone_from(&post.title);
        existing.slug = post.slug.clone();
        existing.body.clone_from(&post.body);
        existing.image.clone_from(&post.image);
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        if table.rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_post(title: &str, slug: &str) -> NewPost {
        NewPost::parse(title, slug, "body", "").unwrap()
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first() {
        let store = MemoryPostStore::new();
        store.create(&new_post("First", "first")).await.unwrap();
        store.create(&new_post("Second", "second")).await.unwrap();
        store.create(&new_post("Third", "third")).await.unwrap();

        let titles: Vec<String> = store
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let store = MemoryPostStore::new();
        store.create(&new_post("One", "same")).await.unwrap();
        let err = store.create(&new_post("Two", "same")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_slug_but_not_take_another() {
        let store = MemoryPostStore::new();
        let a = store.create(&new_post("A", "a")).await.unwrap();
        store.create(&new_post("B", "b")).await.unwrap();

        let updated = store.update(a.id, &new_post("A2", "a")).await.unwrap();
        assert_eq!(updated.title, "A2");
        assert!(updated.updated_at >= a.updated_at);

        let err = store.update(a.id, &new_post("A3", "b")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemoryPostStore::new();
        let err = store
            .update(PostId::new(99), &new_post("X", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let store = MemoryPostStore::new();
        let post = store.create(&new_post("Gone", "gone")).await.unwrap();
        store.delete(post.id).await.unwrap();
        assert!(matches!(
            store.delete(post.id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(store.find_by_slug("gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_account_username_is_unique_and_case_sensitive() {
        let store = MemoryAccountStore::new();
        let admin = Username::parse("admin").unwrap();
        store.insert(&admin, "hash").await.unwrap();

        assert!(matches!(
            store.insert(&admin, "other").await,
            Err(RepositoryError::Conflict(_))
        ));
        store
            .insert(&Username::parse("Admin").unwrap(), "hash")
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_account_find_by_id() {
        let store = MemoryAccountStore::new();
        let account = store
            .insert(&Username::parse("editor").unwrap(), "hash")
            .await
            .unwrap();

        let found = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(found.username.as_str(), "editor");

        store.delete(account.id).await.unwrap();
        assert!(store.find_by_id(account.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_account_delete() {
        let store = MemoryAccountStore::new();
        let account = store
            .insert(&Username::parse("editor").unwrap(), "hash")
            .await
            .unwrap();
        store.delete(account.id).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(matches!(
            store.delete(account.id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
