//! Session layer configuration.
//!
//! The store is passed in by the caller: `PostgresStore` in the binary,
//! `MemoryStore` in tests. The cookie only carries the session id and is
//! signed with a key derived from the configured session secret.

use axum::Router;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::{Key, SameSite, time::Duration},
};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vertebra_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Cookie settings for the session layer.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Secret the cookie signing key is derived from.
    pub secret: SecretString,
    /// Set the `Secure` flag (site served over HTTPS).
    pub secure: bool,
}

impl SessionSettings {
    /// 64-byte signing key: SHA-512 of the secret.
    fn signing_key(&self) -> Key {
        let digest = Sha512::digest(self.secret.expose_secret().as_bytes());
        Key::from(digest.as_slice())
    }
}

/// Wrap `router` in a session layer backed by `store`.
pub fn apply_session_layer<S>(router: Router, store: S, settings: &SessionSettings) -> Router
where
    S: SessionStore + Clone,
{
    let layer = SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(settings.signing_key());

    router.layer(layer)
}
