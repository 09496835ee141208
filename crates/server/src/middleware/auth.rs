//! Authentication extractors and session helpers for the admin panel.
//!
//! An admin is signed in when the server-side session record holds a
//! [`CurrentAdmin`] whose account still exists. Sessions of deleted accounts
//! are flushed on their next request.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::db::AccountStore;
use crate::models::{Account, CurrentAdmin, session_keys};
use crate::state::AppState;

/// Where unauthenticated admin requests are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires a signed-in admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
#[derive(Debug)]
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection for [`RequireAdmin`]: redirect to the login page.
#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(LoginRedirect)?;
        let state = AppState::from_ref(state);

        authenticate(session, state.accounts())
            .await
            .map(Self)
            .ok_or(LoginRedirect)
    }
}

/// Extractor that optionally gets the current admin.
///
/// Public pages use it to show login state in the navigation.
#[derive(Debug)]
pub struct OptionalAdmin(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };
        let state = AppState::from_ref(state);

        Ok(Self(authenticate(session, state.accounts()).await))
    }
}

/// Sign `account` in on this session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn start_session(
    session: &Session,
    account: &Account,
) -> Result<CurrentAdmin, tower_sessions::session::Error> {
    let admin = CurrentAdmin::from(account);
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, &admin).await?;
    Ok(admin)
}

/// The admin signed in on this session, if any.
///
/// Store errors and undecodable records count as signed out.
pub async fn resolve_session(session: &Session) -> Option<CurrentAdmin> {
    match session.get::<CurrentAdmin>(session_keys::CURRENT_ADMIN).await {
        Ok(admin) => admin,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load admin session");
            None
        }
    }
}

/// The signed-in admin, checked against the account store.
///
/// A session whose account has been deleted is flushed. Store failures count
/// as signed out.
pub async fn authenticate(session: &Session, accounts: &dyn AccountStore) -> Option<CurrentAdmin> {
    let admin = resolve_session(session).await?;

    match accounts.find_by_id(admin.id).await {
        Ok(Some(account)) => Some(CurrentAdmin::from(&account)),
        Ok(None) => {
            tracing::info!(account_id = %admin.id, "Session belongs to a deleted account");
            if let Err(e) = destroy_session(session).await {
                tracing::warn!(error = %e, "Failed to flush stale admin session");
            }
            None
        }
        Err(e) => {
            tracing::error!(error = %e, account_id = %admin.id, "Failed to check session account");
            None
        }
    }
}

/// Destroy the session: the server-side record is deleted and the cookie
/// expired.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn destroy_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
