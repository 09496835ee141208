//! Router assembly.
//!
//! [`build`] wires routes, middleware and the session store into one service.
//! The binary serves it over TCP; router tests drive it with `oneshot`.

use std::path::PathBuf;

use axum::{Router, extract::Request, middleware as axum_middleware};
use tower::{Layer, util::MapRequest, util::MapRequestLayer};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::{
    SessionSettings, apply_session_layer, method_override, request_id_middleware,
};
use crate::routes;
use crate::state::AppState;

/// The complete HTTP service: method override in front of the router.
pub type CmsService = MapRequest<Router, fn(Request) -> Request>;

/// Settings `build` needs beyond the stores.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Session cookie settings.
    pub session: SessionSettings,
    /// Directory served as the fallback for unmatched paths.
    pub static_dir: PathBuf,
}

/// Assemble the application.
///
/// Layer order, outermost first: method override, Sentry, tracing, request
/// id, session.
pub fn build<S>(state: AppState, session_store: S, settings: &AppSettings) -> CmsService
where
    S: SessionStore + Clone,
{
    let router = routes::routes()
        .fallback_service(ServeDir::new(&settings.static_dir))
        .with_state(state);

    let router = apply_session_layer(router, session_store, &settings.session)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Must wrap the router: a `Router::layer` runs after route matching.
    MapRequestLayer::new(method_override as fn(Request) -> Request).layer(router)
}
