//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Compute CORS headers once per request
//! - Short-circuit OPTIONS preflight
//! - Reject requests that carry the API key in their path
//! - Dispatch WebSocket upgrades to the relay
//! - Forward everything else to the upstream endpoint
//! - Convert any failure into the fixed JSON-RPC error envelope

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{FromRequestParts, State, WebSocketUpgrade},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::error::{ErrorEnvelope, ProxyError};
use crate::http::request::RequestIdLayer;
use crate::http::websocket;
use crate::security::{cors, secrets};
use crate::upstream::{self, Upstream, UpstreamError};

/// Largest request body the proxy will buffer for forwarding.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Slack added to the outer timeout layer on top of the upstream client
/// timeout. The layer is a backstop for stalls outside the upstream
/// call; the client must always time out first so a hanging upstream
/// surfaces as the JSON-RPC error envelope, not a bare layer response.
const TIMEOUT_BACKSTOP_SECS: u64 = 5;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Upstream,
}

/// HTTP server for the RPC proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails when the upstream URL cannot be constructed from the
    /// configured network and key.
    pub fn new(config: ProxyConfig) -> Result<Self, UpstreamError> {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let upstream = Upstream::new(&config.upstream, request_timeout)?;
        let backstop_timeout = request_timeout + Duration::from_secs(TIMEOUT_BACKSTOP_SECS);

        let state = AppState {
            config: Arc::new(config),
            upstream,
        };

        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(backstop_timeout))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        Ok(Self { router })
    }

    /// Run the server until Ctrl+C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = shutdown.changed() => {}
                }
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler. Three terminal paths: OPTIONS preflight,
/// WebSocket relay, and HTTP forward (success or error envelope).
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let cors_headers = cors::response_headers(&state.config.cors, origin.as_deref());

    // CORS preflight is terminal; nothing is forwarded.
    if request.method() == Method::OPTIONS {
        return (StatusCode::OK, cors_headers).into_response();
    }

    // A key embedded in the request path would leak through logs and
    // referrers. Reject before any upstream contact, upgrades included.
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    if secrets::path_contains_key(path_and_query, state.upstream.api_key()) {
        tracing::warn!("request path contains the upstream API key, rejecting");
        return (
            StatusCode::BAD_REQUEST,
            cors_headers,
            Json(ErrorEnvelope::invalid_request()),
        )
            .into_response();
    }

    if is_websocket_upgrade(request.headers()) {
        tracing::debug!(path = %request.uri().path(), "websocket upgrade");
        let (mut parts, _body) = request.into_parts();
        let mut response = match WebSocketUpgrade::from_request_parts(&mut parts, &state).await {
            Ok(ws) => {
                let upstream = state.upstream.clone();
                ws.on_upgrade(move |socket| websocket::relay(socket, upstream))
            }
            Err(rejection) => rejection.into_response(),
        };
        cors::apply(response.headers_mut(), &cors_headers);
        return response;
    }

    match forward(&state, request).await {
        Ok(mut response) => {
            cors::apply(response.headers_mut(), &cors_headers);
            response
        }
        Err(err) => {
            // Log the real cause, key-redacted; the caller only ever
            // sees the generic envelope.
            tracing::error!(
                error = %secrets::redact_key(&err.to_string(), state.upstream.api_key()),
                "proxying failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                cors_headers,
                Json(ErrorEnvelope::proxy_error()),
            )
                .into_response()
        }
    }
}

/// True when the request asks for a WebSocket upgrade.
fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

/// Buffer the inbound body, reshape, call upstream, and relay the
/// response with the API key redacted.
async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, MAX_BODY_BYTES).await?;

    let (method, payload) = upstream::shape_request(parts.method, body);
    let accept = parts.headers.get(header::ACCEPT).cloned();

    let forwarded = state.upstream.forward(method, accept, payload).await?;

    let body = secrets::redact_body(forwarded.body, state.upstream.api_key());
    let content_type = forwarded
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let response = Response::builder()
        .status(forwarded.status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))?;
    Ok(response)
}
