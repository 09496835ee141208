//! Account management through the admin forms.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use vertebra_core::Username;
use vertebra_integration_tests::TestApp;

async fn create_account(app: &TestApp, cookie: &str, username: &str, password: &str) {
    app.post_form(
        "/admin/users/create",
        &[("username", username), ("password", password)],
        Some(cookie),
    )
    .await
    .assert_redirect("/admin/users?success=created");
}

async fn account_id(app: &TestApp, username: &str) -> i32 {
    app.accounts
        .find_by_username(&Username::parse(username).unwrap())
        .await
        .unwrap()
        .unwrap()
        .0
        .id
        .as_i32()
}

#[tokio::test]
async fn test_users_page_lists_accounts_with_flash() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;
    create_account(&app, &cookie, "editor", "long-enough").await;

    let page = app
        .get("/admin/users?success=created", Some(&cookie))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Account created"));
    assert!(page.body.contains("editor"));
    assert!(page.body.contains("(you)"));
}

#[tokio::test]
async fn test_created_account_can_log_in() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;
    create_account(&app, &cookie, "editor", "long-enough").await;

    assert!(app.try_login("editor", "long-enough").await.is_some());
    assert!(app.try_login("editor", "wrong-password").await.is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_refused() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;

    let response = app
        .post_form(
            "/admin/users/create",
            &[("username", "admin"), ("password", "long-enough")],
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Username already exists"));
    assert_eq!(app.accounts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_weak_password_and_bad_username_are_refused() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;

    let weak = app
        .post_form(
            "/admin/users/create",
            &[("username", "editor"), ("password", "short")],
            Some(&cookie),
        )
        .await;
    assert!(weak.body.contains("at least 8 characters"));
    assert!(weak.body.contains(r#"value="editor""#));

    let spaced = app
        .post_form(
            "/admin/users/create",
            &[("username", "two words"), ("password", "long-enough")],
            Some(&cookie),
        )
        .await;
    assert!(spaced.body.contains("cannot contain spaces"));

    assert_eq!(app.accounts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_self_deletion_is_refused() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;
    let me = account_id(&app, "admin").await;

    app.post_form(
        &format!("/admin/users/delete/{me}?_method=DELETE"),
        &[],
        Some(&cookie),
    )
    .await
    .assert_redirect("/admin/users?error=self_delete");

    assert_eq!(app.accounts.count().await.unwrap(), 1);
    assert_eq!(
        app.get("/admin/dashboard", Some(&cookie)).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_delete_other_account() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;
    create_account(&app, &cookie, "editor", "long-enough").await;
    let editor = account_id(&app, "editor").await;
    let uri = format!("/admin/users/delete/{editor}?_method=DELETE");

    app.post_form(&uri, &[], Some(&cookie))
        .await
        .assert_redirect("/admin/users?success=deleted");
    assert_eq!(app.accounts.count().await.unwrap(), 1);
    assert!(app.try_login("editor", "long-enough").await.is_none());

    app.post_form(&uri, &[], Some(&cookie))
        .await
        .assert_redirect("/admin/users?error=not_found");
}

#[tokio::test]
async fn test_delete_malformed_id() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;

    app.post_form("/admin/users/delete/abc?_method=DELETE", &[], Some(&cookie))
        .await
        .assert_redirect("/admin/users?error=not_found");
}

#[tokio::test]
async fn test_another_admin_may_delete_the_first() {
    let app = TestApp::new().await;
    let admin_cookie = app.login_admin().await;
    create_account(&app, &admin_cookie, "editor", "long-enough").await;
    let admin_id = account_id(&app, "admin").await;

    let editor_cookie = app.try_login("editor", "long-enough").await.unwrap();
    app.post_form(
        &format!("/admin/users/delete/{admin_id}?_method=DELETE"),
        &[],
        Some(&editor_cookie),
    )
    .await
    .assert_redirect("/admin/users?success=deleted");

    assert_eq!(app.accounts.count().await.unwrap(), 1);
    assert!(app.try_login("admin", "admin").await.is_none());
}

#[tokio::test]
async fn test_deleted_account_loses_its_session() {
    let app = TestApp::new().await;
    let admin_cookie = app.login_admin().await;
    create_account(&app, &admin_cookie, "editor", "long-enough").await;
    let editor_cookie = app.try_login("editor", "long-enough").await.unwrap();
    let editor_id = account_id(&app, "editor").await;
    let admin_id = account_id(&app, "admin").await;

    app.post_form(
        &format!("/admin/users/delete/{editor_id}?_method=DELETE"),
        &[],
        Some(&admin_cookie),
    )
    .await
    .assert_redirect("/admin/users?success=deleted");

    app.get("/admin/dashboard", Some(&editor_cookie))
        .await
        .assert_redirect("/admin/login");
    app.post_form(
        &format!("/admin/users/delete/{admin_id}?_method=DELETE"),
        &[],
        Some(&editor_cookie),
    )
    .await
    .assert_redirect("/admin/login");

    assert_eq!(app.accounts.count().await.unwrap(), 1);
    assert_eq!(
        app.get("/admin/dashboard", Some(&admin_cookie)).await.status,
        StatusCode::OK
    );
}
