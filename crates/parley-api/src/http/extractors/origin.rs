//! Request origin extractor.
//!
//! Pulls the `Origin` header out of the request, normalized (trailing
//! slash stripped). The allow-list decision itself lives in the dispatch
//! handler, which also needs the owner from the payload.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::ORIGIN;
use axum::http::request::Parts;

/// The request's `Origin` header value, if any.
///
/// Browsers always send one on cross-origin fetches; a missing origin only
/// passes the gate when the allow-list carries a wildcard entry.
pub struct RequestOrigin(pub Option<String>);

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let origin = parts
            .headers
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim_end_matches('/').to_string());
        Ok(RequestOrigin(origin))
    }
}
