//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Post listing
//! GET  /post/{slug}               - Single post (404 page if unknown)
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (account store)
//!
//! # Admin auth
//! GET  /admin/login               - Login page
//! POST /admin/login               - Login action
//! GET  /admin/logout              - Logout action
//!
//! # Posts (requires auth)
//! GET    /admin/dashboard         - All posts
//! GET    /admin/create            - Create form
//! POST   /admin/create            - Create action
//! GET    /admin/edit/{id}         - Edit form
//! PUT    /admin/edit/{id}         - Edit action
//! DELETE /admin/delete/{id}       - Delete action
//!
//! # Accounts (requires auth)
//! GET    /admin/users             - Account list
//! GET    /admin/users/create      - Create form
//! POST   /admin/users/create      - Create action
//! DELETE /admin/users/delete/{id} - Delete action (never self)
//! ```
//!
//! PUT and DELETE are reached from HTML forms through `POST ?_method=...`.

pub mod auth;
pub mod posts;
pub mod public;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};

use crate::state::AppState;

/// Where admin actions land after completing.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Build the application router (without middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::index))
        .route("/post/{slug}", get(public::show))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/admin", admin_routes())
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(posts::dashboard))
        .route("/create", get(posts::create_page).post(posts::create))
        .route("/edit/{id}", get(posts::edit_page).put(posts::update))
        .route("/delete/{id}", delete(posts::delete))
        .route("/users", get(users::index))
        .route("/users/create", get(users::create_page).post(users::create))
        .route("/users/delete/{id}", delete(users::delete))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the account store does not answer.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.accounts().count().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
