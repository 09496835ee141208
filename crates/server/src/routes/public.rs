//! Public blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAdmin;
use crate::models::Post;
use crate::state::AppState;

/// Characters of body text shown on the listing page.
const EXCERPT_CHARS: usize = 240;

/// Post view for templates.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub image: Option<String>,
    pub excerpt: String,
    pub published_on: String,
    /// Set when the post was edited on a later day than it was published.
    pub updated_on: Option<String>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.as_i32(),
            title: post.title.clone(),
            slug: post.slug.to_string(),
            body: post.body.clone(),
            image: (!post.image.is_empty()).then(|| post.image.clone()),
            excerpt: excerpt(&post.body, EXCERPT_CHARS),
            published_on: display_date(&post.created_at),
            updated_on: (post.updated_at.date_naive() > post.created_at.date_naive())
                .then(|| display_date(&post.updated_at)),
        }
    }
}

fn display_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

fn excerpt(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", trimmed[..cut].trim_end()),
        None => trimmed.to_owned(),
    }
}

/// Post listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<String>,
    pub posts: Vec<PostView>,
}

/// Single post page template.
#[derive(Template, WebTemplate)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub current_user: Option<String>,
    pub post: PostView,
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub current_user: Option<String>,
}

/// List all posts, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the post store fails.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAdmin(admin): OptionalAdmin,
) -> Result<IndexTemplate, AppError> {
    let posts = state.posts().list_recent().await?;

    Ok(IndexTemplate {
        current_user: admin.map(|a| a.username.into_inner()),
        posts: posts.iter().map(PostView::from).collect(),
    })
}

/// Show a single post by slug.
///
/// # Errors
///
/// Returns `AppError::Database` if the post store fails. An unknown slug is a
/// rendered 404 page, not an error.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAdmin(admin): OptionalAdmin,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let current_user = admin.map(|a| a.username.into_inner());

    let Some(post) = state.posts().find_by_slug(&slug).await? else {
        tracing::debug!(%slug, "Post not found");
        return Ok((StatusCode::NOT_FOUND, NotFoundTemplate { current_user }).into_response());
    };

    Ok(PostTemplate {
        current_user,
        post: PostView::from(&post),
    }
    .into_response())
}
