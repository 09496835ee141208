//! Blog post store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vertebra_core::{PostId, Slug};

use super::{RepositoryError, conflict_or_database};
use crate::models::{NewPost, Post};

/// Persistence contract for blog posts.
///
/// Every method is a single-document operation; concurrent edits of the same
/// post are last-write-wins.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first (ties broken by descending id).
    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError>;

    /// Find a post by exact slug match.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError>;

    /// Find a post by id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError>;

    /// Create a post. Returns `RepositoryError::Conflict` if the slug is taken.
    async fn create(&self, post: &NewPost) -> Result<Post, RepositoryError>;

    /// Replace a post's fields and bump `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::Conflict` if another post already uses the slug.
    async fn update(&self, id: PostId, post: &NewPost) -> Result<Post, RepositoryError>;

    /// Delete a post. Returns `RepositoryError::NotFound` for an unknown id.
    async fn delete(&self, id: PostId) -> Result<(), RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i32,
    title: String,
    slug: String,
    body: String,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = RepositoryError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Self {
            id: PostId::new(row.id),
            title: row.title,
            slug,
            body: row.body,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `PostgreSQL`-backed post store.
#[derive(Debug, Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    /// Create a new post store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r"
            SELECT id, title, slug, body, image, created_at, updated_at
            FROM post
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"
            SELECT id, title, slug, body, image, created_at, updated_at
            FROM post
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"
            SELECT id, title, slug, body, image, created_at, updated_at
            FROM post
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, post: &NewPost) -> Result<Post, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"
            INSERT INTO post (title, slug, body, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, slug, body, image, created_at, updated_at
            ",
        )
        .bind(&post.title)
        .bind(post.slug.as_str())
        .bind(&post.body)
        .bind(&post.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "slug"))?;

        row.try_into()
    }

    async fn update(&self, id: PostId, post: &NewPost) -> Result<Post, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"
            UPDATE post
            SET title = $1, slug = $2, body = $3, image = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, title, slug, body, image, created_at, updated_at
            ",
        )
        .bind(&post.title)
        .bind(post.slug.as_str())
        .bind(&post.body)
        .bind(&post.image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "slug"))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM post WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
