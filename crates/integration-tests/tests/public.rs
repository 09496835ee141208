//! Public pages and operational endpoints.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use vertebra_cms::db::memory::MemoryAccountStore;
use vertebra_cms::db::{PostStore, RepositoryError};
use vertebra_cms::models::{NewPost, Post};
use vertebra_core::PostId;
use vertebra_integration_tests::TestApp;

/// Post store whose every call fails like a lost database connection.
struct UnavailablePostStore;

#[async_trait]
impl PostStore for UnavailablePostStore {
    async fn list_recent(&self) -> Result<Vec<Post>, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Post>, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_id(&self, _id: PostId) -> Result<Option<Post>, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn create(&self, _post: &NewPost) -> Result<Post, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update(&self, _id: PostId, _post: &NewPost) -> Result<Post, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn delete(&self, _id: PostId) -> Result<(), RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

async fn publish(app: &TestApp, title: &str, slug: &str, body: &str) -> Post {
    app.posts
        .create(&NewPost::parse(title, slug, body, "").expect("valid post"))
        .await
        .expect("create post")
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let app = TestApp::new().await;
    publish(&app, "Oldest entry", "oldest", "one").await;
    publish(&app, "Middle entry", "middle", "two").await;
    publish(&app, "Newest entry", "newest", "three").await;

    let response = app.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let newest = response.body.find("Newest entry").expect("newest listed");
    let middle = response.body.find("Middle entry").expect("middle listed");
    let oldest = response.body.find("Oldest entry").expect("oldest listed");
    assert!(newest < middle && middle < oldest);
}

#[tokio::test]
async fn test_empty_listing_renders() {
    let app = TestApp::new().await;
    let response = app.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Nothing published yet"));
}

#[tokio::test]
async fn test_post_page_shows_exact_values() {
    let app = TestApp::new().await;
    publish(&app, "A", "a", "B").await;

    let response = app.get("/post/a", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>A</h1>"));
    assert!(response.body.contains(r#"<div class="post-body">B</div>"#));
    assert!(!response.body.contains("post-image"));
}

#[tokio::test]
async fn test_post_page_shows_header_image() {
    let app = TestApp::new().await;
    app.posts
        .create(&NewPost::parse("Pictured", "pictured", "text", "/img/cover.jpg").unwrap())
        .await
        .unwrap();

    let response = app.get("/post/pictured", None).await;
    assert!(response.body.contains(r#"src="/img/cover.jpg""#));
}

#[tokio::test]
async fn test_post_body_is_escaped() {
    let app = TestApp::new().await;
    publish(&app, "Escaping", "escaping", "<script>alert(1)</script>").await;

    let response = app.get("/post/escaping", None).await;
    assert!(!response.body.contains("<script>"));
    assert!(response.body.contains("&#60;script&#62;alert(1)&#60;/script&#62;"));
}

#[tokio::test]
async fn test_unknown_slug_is_not_found_page() {
    let app = TestApp::new().await;
    publish(&app, "Exists", "exists", "").await;

    let response = app.get("/post/does-not-exist", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Post not found"));
}

#[tokio::test]
async fn test_slug_lookup_is_exact() {
    let app = TestApp::new().await;
    publish(&app, "Exact", "exact", "").await;

    assert_eq!(app.get("/post/Exact", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/post/exac", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let app = TestApp::with_stores(
        Arc::new(UnavailablePostStore),
        Arc::new(MemoryAccountStore::new()),
    );

    let listing = app.get("/", None).await;
    assert_eq!(listing.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(listing.body, "Internal server error");

    let single = app.get("/post/anything", None).await;
    assert_eq!(single.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!single.body.contains("PoolTimedOut"));
}

#[tokio::test]
async fn test_navigation_reflects_login_state() {
    let app = TestApp::new().await;

    let anonymous = app.get("/", None).await;
    assert!(anonymous.body.contains(r#"href="/admin/login""#));
    assert!(!anonymous.body.contains("Log out"));

    let cookie = app.login_admin().await;
    let signed_in = app.get("/", Some(&cookie)).await;
    assert!(signed_in.body.contains("Log out"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let live = app.get("/health", None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    assert_eq!(app.get("/health/ready", None).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let app = TestApp::new().await;

    let css = app.get("/css/style.css", None).await;
    assert_eq!(css.status, StatusCode::OK);
    assert!(css.body.contains(".post-body"));

    assert_eq!(
        app.get("/css/missing.css", None).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;
    let response = app.get("/health", None).await;
    assert!(response.headers.contains_key("x-request-id"));
}
