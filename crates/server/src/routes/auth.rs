//! Admin login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user, user_message};
use crate::filters;
use crate::middleware::{OptionalAdmin, destroy_session, start_session};
use crate::routes::DASHBOARD_PATH;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<String>,
    pub error: Option<String>,
    pub username: String,
}

impl LoginTemplate {
    fn with_error(username: String, error: impl Into<String>) -> Self {
        Self {
            current_user: None,
            error: Some(error.into()),
            username,
        }
    }
}

/// Display the login page, or skip it when already signed in.
pub async fn login_page(OptionalAdmin(admin): OptionalAdmin) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    LoginTemplate {
        current_user: None,
        error: None,
        username: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// Every credential mismatch renders the same "Invalid credentials" message.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.accounts());

    let account = match auth.login(&form.username, &form.password).await {
        Ok(account) => account,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "Failed login attempt");
            return LoginTemplate::with_error(form.username, "Invalid credentials").into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, username = %form.username, "Login failed");
            return LoginTemplate::with_error(form.username, user_message(&e)).into_response();
        }
    };

    match start_session(&session, &account).await {
        Ok(admin) => {
            set_sentry_user(&admin.id, admin.username.as_str());
            tracing::info!(account_id = %admin.id, "Admin logged in");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start session");
            LoginTemplate::with_error(form.username, "Something went wrong").into_response()
        }
    }
}

/// Destroy the session and return to the public site.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = destroy_session(&session).await {
        tracing::error!(error = %e, "Failed to destroy session");
    }
    clear_sentry_user();

    Redirect::to("/")
}
