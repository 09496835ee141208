//! Blog post domain types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use vertebra_core::{PostId, Slug, SlugError};

/// A published blog post (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Unique post ID.
    pub id: PostId,
    /// Post title.
    pub title: String,
    /// URL segment under `/post/`.
    pub slug: Slug,
    /// Post body text.
    pub body: String,
    /// Header image URL or path; empty when the post has none.
    pub image: String,
    /// When the post was created (listing order).
    pub created_at: DateTime<Utc>,
    /// When the post was last edited.
    pub updated_at: DateTime<Utc>,
}

/// Errors from validating submitted post fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("invalid slug: {0}")]
    Slug(#[from] SlugError),
}

/// Validated fields for creating or replacing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub slug: Slug,
    pub body: String,
    pub image: String,
}

impl NewPost {
    /// Validate raw form values.
    ///
    /// Title and image are trimmed; the body is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `PostValidationError::EmptyTitle` for a blank title and
    /// `PostValidationError::Slug` for an unusable slug.
    pub fn parse(
        title: &str,
        slug: &str,
        body: &str,
        image: &str,
    ) -> Result<Self, PostValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_owned(),
            slug: Slug::parse(slug.trim())?,
            body: body.to_owned(),
            image: image.trim().to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_exact_values() {
        let post = NewPost::parse("A", "a", "B", "").unwrap();
        assert_eq!(post.title, "A");
        assert_eq!(post.slug.as_str(), "a");
        assert_eq!(post.body, "B");
        assert_eq!(post.image, "");
    }

    #[test]
    fn test_parse_trims_title_and_image_only() {
        let post = NewPost::parse("  Hello  ", " hello ", "  indented\n", " /img.png ").unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.slug.as_str(), "hello");
        assert_eq!(post.body, "  indented\n");
        assert_eq!(post.image, "/img.png");
    }

    #[test]
    fn test_parse_rejects_blank_title() {
        assert_eq!(
            NewPost::parse("   ", "a", "", ""),
            Err(PostValidationError::EmptyTitle)
        );
    }

    #[test]
    fn test_parse_rejects_bad_slug() {
        assert!(matches!(
            NewPost::parse("Title", "has space", "", ""),
            Err(PostValidationError::Slug(SlugError::InvalidCharacter))
        ));
        assert!(matches!(
            NewPost::parse("Title", "", "", ""),
            Err(PostValidationError::Slug(SlugError::Empty))
        ));
    }
}
