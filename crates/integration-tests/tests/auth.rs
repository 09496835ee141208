//! Login, logout and the admin guard.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};

use vertebra_integration_tests::{ADMIN_PASSWORD, TestApp};

const GUARDED_GETS: &[&str] = &[
    "/admin/dashboard",
    "/admin/create",
    "/admin/edit/1",
    "/admin/users",
    "/admin/users/create",
];

#[tokio::test]
async fn test_login_page_renders() {
    let app = TestApp::new().await;
    let response = app.get("/admin/login", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"action="/admin/login""#));
}

#[tokio::test]
async fn test_valid_login_authenticates_until_logout() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/admin/login",
            &[("username", "admin"), ("password", ADMIN_PASSWORD)],
            None,
        )
        .await;
    response.assert_redirect("/admin/dashboard");
    let cookie = response.session_cookie().unwrap();

    let dashboard = app.get("/admin/dashboard", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("admin"));

    app.get("/admin/logout", Some(&cookie))
        .await
        .assert_redirect("/");

    app.get("/admin/dashboard", Some(&cookie))
        .await
        .assert_redirect("/admin/login");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new().await;

    let wrong_password = app
        .post_form(
            "/admin/login",
            &[("username", "admin"), ("password", "not-the-password")],
            None,
        )
        .await;
    let unknown_user = app
        .post_form(
            "/admin/login",
            &[("username", "nobody"), ("password", ADMIN_PASSWORD)],
            None,
        )
        .await;

    for response in [&wrong_password, &unknown_user] {
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("Invalid credentials"));
        assert_eq!(response.session_cookie(), None);
    }
}

#[tokio::test]
async fn test_username_is_case_sensitive() {
    let app = TestApp::new().await;
    assert_eq!(app.try_login("Admin", ADMIN_PASSWORD).await, None);
}

#[tokio::test]
async fn test_empty_login_form_is_rejected_gracefully() {
    let app = TestApp::new().await;
    let response = app.post_form("/admin/login", &[], None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_failed_login_keeps_username() {
    let app = TestApp::new().await;
    let response = app
        .post_form(
            "/admin/login",
            &[("username", "editor"), ("password", "nope")],
            None,
        )
        .await;
    assert!(response.body.contains(r#"value="editor""#));
}

#[tokio::test]
async fn test_guard_redirects_anonymous_requests() {
    let app = TestApp::new().await;

    for path in GUARDED_GETS {
        app.get(path, None).await.assert_redirect("/admin/login");
    }

    app.post_form("/admin/create", &[("title", "x"), ("slug", "x")], None)
        .await
        .assert_redirect("/admin/login");
    app.request(Method::DELETE, "/admin/delete/1", None)
        .await
        .assert_redirect("/admin/login");
    app.post_form("/admin/users/delete/1?_method=DELETE", &[], None)
        .await
        .assert_redirect("/admin/login");

    assert_eq!(app.accounts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_forged_cookie_is_anonymous() {
    let app = TestApp::new().await;
    app.get("/admin/dashboard", Some("vertebra_session=forged-value"))
        .await
        .assert_redirect("/admin/login");
}

#[tokio::test]
async fn test_login_page_skips_when_signed_in() {
    let app = TestApp::new().await;
    let cookie = app.login_admin().await;

    app.get("/admin/login", Some(&cookie))
        .await
        .assert_redirect("/admin/dashboard");
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let app = TestApp::new().await;
    app.get("/admin/logout", None).await.assert_redirect("/");
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let app = TestApp::new().await;
    let first = app.login_admin().await;
    let second = app.login_admin().await;
    assert_ne!(first, second);

    app.get("/admin/logout", Some(&first)).await;

    assert_eq!(
        app.get("/admin/dashboard", Some(&second)).await.status,
        StatusCode::OK
    );
}
