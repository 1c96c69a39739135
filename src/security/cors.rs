//! CORS policy evaluation.
//!
//! # Responsibilities
//! - Decide the `Access-Control-Allow-Origin` value for a request
//! - Produce the full header set attached to every response
//! - Handle `OPTIONS` preflight short-circuit (in the server handler)
//!
//! # Design Decisions
//! - Origins match by exact string comparison, no wildcards or globs
//! - When an allow-list is configured and the request origin is absent
//!   or not a member, the allow-origin header is omitted entirely; the
//!   proxy never falls back to `*` in that case
//! - `Vary: Origin` is set whenever the response depends on the origin

use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
};

use crate::config::CorsConfig;

/// Methods advertised in preflight responses.
pub const ALLOWED_METHODS: &str = "GET, HEAD, POST, PUT, OPTIONS";

/// Outcome of matching a request origin against the configured policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// No allow-list configured: any origin may read the response.
    Any,
    /// The origin is a member of the allow-list: echo it back.
    Exact(String),
    /// Allow-list configured but the origin is absent or not a member:
    /// omit the allow-origin header.
    Skip,
}

/// Match a request `Origin` header against the configured allow-list.
pub fn evaluate_origin(config: &CorsConfig, origin: Option<&str>) -> OriginDecision {
    if config.allows_any() {
        return OriginDecision::Any;
    }
    match origin {
        Some(value) if config.allowed_origins.iter().any(|o| o == value) => {
            OriginDecision::Exact(value.to_string())
        }
        _ => OriginDecision::Skip,
    }
}

/// Compute the CORS header set for a request. Called once per request;
/// the result is attached to every response, including errors.
pub fn response_headers(config: &CorsConfig, origin: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));

    match evaluate_origin(config, origin) {
        OriginDecision::Any => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
        OriginDecision::Exact(value) => {
            // The origin came in as a valid header value, so conversion
            // back cannot fail for list members that match it exactly.
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
            headers.insert(VARY, HeaderValue::from_static("Origin"));
        }
        OriginDecision::Skip => {
            headers.insert(VARY, HeaderValue::from_static("Origin"));
        }
    }

    headers
}

/// Merge the computed CORS header set into a response's headers.
pub fn apply(target: &mut HeaderMap, cors: &HeaderMap) {
    for (name, value) in cors {
        target.insert(name.clone(), value.clone());
    }
}
