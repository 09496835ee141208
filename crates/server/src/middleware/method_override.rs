//! HTML form method override.
//!
//! Browsers only submit GET and POST, so edit and delete forms post to
//! `...?_method=PUT` or `...?_method=DELETE`. This rewrite has to run before
//! the router matches, so it wraps the whole `Router` via
//! `tower::util::MapRequestLayer` rather than `Router::layer`.

use axum::{
    extract::Query,
    http::{Method, Request},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Override {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// Rewrite `POST ?_method=PUT|PATCH|DELETE` to that method.
///
/// Any other method, or an unrecognized override value, passes through.
pub fn method_override<B>(mut request: Request<B>) -> Request<B> {
    if request.method() != Method::POST {
        return request;
    }

    let Ok(Query(Override {
        method: Some(requested),
    })) = Query::<Override>::try_from_uri(request.uri())
    else {
        return request;
    };

    let method = match requested.to_ascii_uppercase().as_str() {
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        _ => return request,
    };

    tracing::trace!(%method, path = %request.uri().path(), "Method override");
    *request.method_mut() = method;
    request
}
