//! Admin account management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use vertebra_core::AccountId;

use crate::error::{AppError, user_message};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Account;
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

const USERS_PATH: &str = "/admin/users";

/// Flash parameters set by the create/delete redirects.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl UsersQuery {
    fn success_message(&self) -> Option<String> {
        match self.success.as_deref()? {
            "created" => Some("Account created".to_string()),
            "deleted" => Some("Account deleted".to_string()),
            _ => None,
        }
    }

    fn error_message(&self) -> Option<String> {
        match self.error.as_deref()? {
            "self_delete" => Some("You cannot delete your own account".to_string()),
            "not_found" => Some("Account not found".to_string()),
            "server" => Some("Something went wrong".to_string()),
            _ => None,
        }
    }
}

/// Create account form data.
#[derive(Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CreateUserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account row for templates.
#[derive(Debug, Clone)]
pub struct AccountView {
    pub id: i32,
    pub username: String,
    pub created_on: String,
    pub is_current: bool,
}

impl AccountView {
    fn new(account: &Account, current: AccountId) -> Self {
        Self {
            id: account.id.as_i32(),
            username: account.username.to_string(),
            created_on: account.created_at.format("%Y-%m-%d").to_string(),
            is_current: account.id == current,
        }
    }
}

/// Account list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub current_user: Option<String>,
    pub accounts: Vec<AccountView>,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Create account template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/create_user.html")]
pub struct CreateUserTemplate {
    pub current_user: Option<String>,
    pub error: Option<String>,
    pub username: String,
    pub min_password_length: usize,
}

/// List all accounts.
///
/// # Errors
///
/// Returns `AppError::Auth` if the account store fails.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<UsersTemplate, AppError> {
    let accounts = AuthService::new(state.accounts()).list_accounts().await?;

    Ok(UsersTemplate {
        accounts: accounts
            .iter()
            .map(|a| AccountView::new(a, admin.id))
            .collect(),
        success: query.success_message(),
        error: query.error_message(),
        current_user: Some(admin.username.into_inner()),
    })
}

/// Display the create account form.
pub async fn create_page(RequireAdmin(admin): RequireAdmin) -> CreateUserTemplate {
    CreateUserTemplate {
        current_user: Some(admin.username.into_inner()),
        error: None,
        username: String::new(),
        min_password_length: MIN_PASSWORD_LENGTH,
    }
}

/// Handle create account form submission.
#[instrument(skip(admin, state, form), fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Response {
    let auth = AuthService::new(state.accounts());

    match auth.create_account(&form.username, &form.password).await {
        Ok(account) => {
            tracing::info!(account_id = %account.id, username = %account.username, "Account created");
            Redirect::to(&format!("{USERS_PATH}?success=created")).into_response()
        }
        Err(e) => {
            if matches!(e, AuthError::Repository(_) | AuthError::PasswordHash) {
                tracing::error!(error = %e, "Failed to create account");
            } else {
                tracing::warn!(error = %e, username = %form.username, "Account creation refused");
            }

            CreateUserTemplate {
                current_user: Some(admin.username.into_inner()),
                error: Some(user_message(&e)),
                username: form.username,
                min_password_length: MIN_PASSWORD_LENGTH,
            }
            .into_response()
        }
    }
}

/// Delete an account (`DELETE`, or `POST ?_method=DELETE`).
///
/// The signed-in account can never delete itself.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Redirect {
    let outcome = match id.parse::<AccountId>() {
        Ok(target) => {
            let auth = AuthService::new(state.accounts());
            match auth.delete_account(admin.id, target).await {
                Ok(()) => {
                    tracing::info!(account_id = %target, "Account deleted");
                    "success=deleted"
                }
                Err(AuthError::SelfDeletion) => {
                    tracing::warn!("Refused self-deletion");
                    "error=self_delete"
                }
                Err(AuthError::AccountNotFound) => "error=not_found",
                Err(e) => {
                    tracing::error!(error = %e, account_id = %target, "Failed to delete account");
                    "error=server"
                }
            }
        }
        Err(_) => "error=not_found",
    };

    Redirect::to(&format!("{USERS_PATH}?{outcome}"))
}
