//! HTTP middleware stack for the CMS.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Method override (`POST ?_method=PUT|PATCH|DELETE`, applied before routing)
//! 2. Sentry layers (hub per request, HTTP context)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Session layer (tower-sessions, signed cookie)

pub mod auth;
pub mod method_override;
pub mod request_id;
pub mod session;

pub use auth::{
    LOGIN_PATH, LoginRedirect, OptionalAdmin, RequireAdmin, authenticate, destroy_session,
    resolve_session, start_session,
};
pub use method_override::method_override;
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, SessionSettings, apply_session_layer};
