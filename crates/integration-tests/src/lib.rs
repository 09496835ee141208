//! Router-level tests for Vertebra CMS.
//!
//! Tests drive the full application service (method override, sessions,
//! routing, templates) with `tower::ServiceExt::oneshot`, backed by in-memory
//! stores and `tower_sessions::MemoryStore`. No database or network needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vertebra-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `public` - Listing, slug lookup, operational endpoints
//! - `auth` - Login, logout, the admin guard
//! - `posts` - Post management through the admin forms
//! - `users` - Account management through the admin forms
//! - `postgres` - Store and router checks against a live database (ignored by default)

#![allow(clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use vertebra_cms::app::{self, AppSettings, CmsService};
use vertebra_cms::config::SeedCredentials;
use vertebra_cms::db::memory::{MemoryAccountStore, MemoryPostStore};
use vertebra_cms::db::{AccountStore, PostStore};
use vertebra_cms::middleware::{SESSION_COOKIE_NAME, SessionSettings};
use vertebra_cms::services::bootstrap::ensure_default_account;
use vertebra_cms::state::AppState;

/// Password of the seeded `admin` account.
pub const ADMIN_PASSWORD: &str = "admin";

const TEST_SESSION_SECRET: &str = "k3Y!9vQz#T1m@Lp7&Wx2^Rb5*Nc8$Hd4";
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A fully wired application over in-memory stores.
pub struct TestApp {
    service: CmsService,
    /// Post store behind the app.
    pub posts: Arc<dyn PostStore>,
    /// Account store behind the app.
    pub accounts: Arc<dyn AccountStore>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the session cookie set by this response, if any.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }

    /// Assert a `303 See Other` to `target`.
    pub fn assert_redirect(&self, target: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location(), Some(target));
    }
}

impl TestApp {
    /// Fresh app with the default `admin` / `admin` account seeded.
    pub async fn new() -> Self {
        let app = Self::with_stores(
            Arc::new(MemoryPostStore::new()),
            Arc::new(MemoryAccountStore::new()),
        );
        ensure_default_account(app.accounts.as_ref(), &SeedCredentials::default())
            .await
            .expect("seed admin account");
        app
    }

    /// App over the given stores, without seeding.
    #[must_use]
    pub fn with_stores(posts: Arc<dyn PostStore>, accounts: Arc<dyn AccountStore>) -> Self {
        let settings = AppSettings {
            session: SessionSettings {
                secret: SecretString::from(TEST_SESSION_SECRET),
                secure: false,
            },
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../server/public"),
        };
        let state = AppState::new(Arc::clone(&posts), Arc::clone(&accounts));
        let service = app::build(state, MemoryStore::default(), &settings);

        Self {
            service,
            posts,
            accounts,
        }
    }

    /// Send a request and buffer the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .service
            .clone()
            .oneshot(request)
            .await
            .expect("service is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET uri`, optionally with a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(build_request(Method::GET, uri, cookie, None))
            .await
    }

    /// `POST uri` with an urlencoded form body.
    pub async fn post_form(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> TestResponse {
        self.send(build_request(Method::POST, uri, cookie, Some(fields)))
            .await
    }

    /// A bodiless request with an arbitrary method.
    pub async fn request(&self, method: Method, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(build_request(method, uri, cookie, None)).await
    }

    /// Log in and return the session cookie, or `None` if login failed.
    pub async fn try_login(&self, username: &str, password: &str) -> Option<String> {
        let response = self
            .post_form(
                "/admin/login",
                &[("username", username), ("password", password)],
                None,
            )
            .await;

        if response.location() == Some("/admin/dashboard") {
            response.session_cookie()
        } else {
            None
        }
    }

    /// Log in as the seeded admin.
    pub async fn login_admin(&self) -> String {
        self.try_login("admin", ADMIN_PASSWORD)
            .await
            .expect("seeded admin can log in")
    }
}

fn build_request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&[(&str, &str)]>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let body = match form {
        Some(fields) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(encode_form(fields))
        }
        None => Body::empty(),
    };

    builder.body(body).expect("valid request")
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}
