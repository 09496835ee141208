//! Admin post management handlers.
//!
//! Create re-renders the form on failure. Edit and delete log failures and
//! return to the dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use vertebra_core::PostId;

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{NewPost, PostValidationError};
use crate::routes::DASHBOARD_PATH;
use crate::routes::public::PostView;
use crate::state::AppState;

/// Create/edit post form data.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image: String,
}

impl PostForm {
    fn parse(&self) -> Result<NewPost, PostValidationError> {
        NewPost::parse(&self.title, &self.slug, &self.body, &self.image)
    }
}

impl From<&PostView> for PostForm {
    fn from(post: &PostView) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            body: post.body.clone(),
            image: post.image.clone().unwrap_or_default(),
        }
    }
}

fn validation_message(err: &PostValidationError) -> String {
    match err {
        PostValidationError::EmptyTitle => "Title is required".to_string(),
        PostValidationError::Slug(e) => format!("Invalid slug: {e}"),
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub current_user: Option<String>,
    pub posts: Vec<PostView>,
}

/// Create post page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/create_post.html")]
pub struct CreatePostTemplate {
    pub current_user: Option<String>,
    pub error: Option<String>,
    pub post: PostForm,
}

/// Edit post page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_post.html")]
pub struct EditPostTemplate {
    pub current_user: Option<String>,
    pub id: i32,
    pub post: PostForm,
}

/// All posts, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the post store fails.
#[instrument(skip(admin, state))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<DashboardTemplate, AppError> {
    let posts = state.posts().list_recent().await?;

    Ok(DashboardTemplate {
        current_user: Some(admin.username.into_inner()),
        posts: posts.iter().map(PostView::from).collect(),
    })
}

/// Display the empty create form.
pub async fn create_page(RequireAdmin(admin): RequireAdmin) -> CreatePostTemplate {
    CreatePostTemplate {
        current_user: Some(admin.username.into_inner()),
        error: None,
        post: PostForm::default(),
    }
}

/// Handle create form submission.
#[instrument(skip(admin, state, form), fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<PostForm>,
) -> Response {
    let form_error = |error: String, post: PostForm| {
        CreatePostTemplate {
            current_user: Some(admin.username.to_string()),
            error: Some(error),
            post,
        }
        .into_response()
    };

    let new_post = match form.parse() {
        Ok(post) => post,
        Err(e) => return form_error(validation_message(&e), form),
    };

    match state.posts().create(&new_post).await {
        Ok(post) => {
            tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        Err(RepositoryError::Conflict(_)) => form_error(
            format!("A post with the slug \"{}\" already exists", new_post.slug),
            form,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create post");
            form_error("Error creating post".to_string(), form)
        }
    }
}

/// Display the edit form pre-filled with the post.
///
/// An unknown or malformed id goes back to the dashboard.
#[instrument(skip(admin, state))]
pub async fn edit_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<PostId>() else {
        return Redirect::to(DASHBOARD_PATH).into_response();
    };

    match state.posts().find_by_id(id).await {
        Ok(Some(post)) => {
            let view = PostView::from(&post);
            EditPostTemplate {
                current_user: Some(admin.username.into_inner()),
                id: view.id,
                post: PostForm::from(&view),
            }
            .into_response()
        }
        Ok(None) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(e) => {
            tracing::error!(error = %e, post_id = %id, "Failed to load post for editing");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
    }
}

/// Handle edit form submission (`PUT`, or `POST ?_method=PUT`).
#[instrument(skip(_admin, state, form))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> Redirect {
    let Ok(id) = id.parse::<PostId>() else {
        tracing::warn!(%id, "Update for malformed post id");
        return Redirect::to(DASHBOARD_PATH);
    };

    let result = match form.parse() {
        Ok(new_post) => state.posts().update(id, &new_post).await,
        Err(e) => {
            tracing::warn!(post_id = %id, error = %e, "Rejected post update");
            return Redirect::to(DASHBOARD_PATH);
        }
    };

    match result {
        Ok(post) => tracing::info!(post_id = %post.id, slug = %post.slug, "Post updated"),
        Err(e @ (RepositoryError::NotFound | RepositoryError::Conflict(_))) => {
            tracing::warn!(post_id = %id, error = %e, "Post update refused");
        }
        Err(e) => tracing::error!(post_id = %id, error = %e, "Failed to update post"),
    }

    Redirect::to(DASHBOARD_PATH)
}

/// Delete a post (`DELETE`, or `POST ?_method=DELETE`).
///
/// Deleting a missing post is not an error.
#[instrument(skip(_admin, state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Redirect {
    let Ok(id) = id.parse::<PostId>() else {
        tracing::warn!(%id, "Delete for malformed post id");
        return Redirect::to(DASHBOARD_PATH);
    };

    match state.posts().delete(id).await {
        Ok(()) => tracing::info!(post_id = %id, "Post deleted"),
        Err(RepositoryError::NotFound) => tracing::debug!(post_id = %id, "Post already gone"),
        Err(e) => tracing::error!(post_id = %id, error = %e, "Failed to delete post"),
    }

    Redirect::to(DASHBOARD_PATH)
}
