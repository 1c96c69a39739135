//! Upstream provider integration.
//!
//! # Data Flow
//! ```text
//! Inbound method + body
//!     → shape_request (GET→POST translation, default RPC body)
//!     → Upstream::forward (reqwest call with the key embedded in the URL)
//!     → Forwarded { status, content_type, body }
//! ```
//!
//! # Design Decisions
//! - URLs are constructed once at startup; a malformed network or key
//!   fails the process early instead of every request
//! - The reqwest client is shared across requests for connection reuse
//!   and carries the configured request timeout
//! - An explicit endpoint override bypasses network-based routing, for
//!   providers without subdomain routing and for tests

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::ProxyError;

/// Failures while resolving the upstream at startup.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Default JSON-RPC payload synthesized for bodyless GET requests; the
/// upstream endpoint only answers POSTed JSON-RPC bodies.
pub const DEFAULT_RPC_BODY: &str =
    r#"{"jsonrpc":"2.0","method":"eth_blockNumber","params":[],"id":1}"#;

/// A relayed upstream response.
#[derive(Debug)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Handle to the single configured upstream provider.
///
/// Owns the resolved HTTP and WebSocket URLs (with the API key embedded)
/// and the shared HTTP client.
#[derive(Debug, Clone)]
pub struct Upstream {
    http_url: Url,
    ws_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl Upstream {
    /// Resolve endpoint URLs and build the shared client.
    pub fn new(config: &UpstreamConfig, request_timeout: Duration) -> Result<Self, UpstreamError> {
        let (http_url, ws_url) = match &config.endpoint {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let http_url = Url::parse(&format!("{}/{}", base, config.api_key))?;
                let mut ws_url = http_url.clone();
                let ws_scheme = if http_url.scheme() == "https" { "wss" } else { "ws" };
                // Scheme swap between known values cannot fail.
                let _ = ws_url.set_scheme(ws_scheme);
                (http_url, ws_url)
            }
            None => {
                let http_url = Url::parse(&format!(
                    "https://{}.g.alchemy.com/v2/{}",
                    config.network, config.api_key
                ))?;
                let ws_url = Url::parse(&format!(
                    "wss://{}.g.alchemy.com/v2/{}",
                    config.network, config.api_key
                ))?;
                (http_url, ws_url)
            }
        };

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http_url,
            ws_url,
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// The WebSocket endpoint, with the key embedded.
    pub fn ws_url(&self) -> &Url {
        &self.ws_url
    }

    /// The literal API key, for path rejection and redaction scans.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Forward a shaped request to the upstream endpoint and buffer the
    /// response. The inbound `Accept` header is propagated when present.
    pub async fn forward(
        &self,
        method: Method,
        accept: Option<HeaderValue>,
        body: Bytes,
    ) -> Result<Forwarded, ProxyError> {
        let mut request = self
            .client
            .request(method, self.http_url.clone())
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }

        // Empty bodies are sent as absent rather than zero-length.
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(Forwarded {
            status,
            content_type,
            body,
        })
    }
}

/// Reshape an inbound request for the upstream endpoint.
///
/// A GET with an empty body becomes a POST carrying the default
/// `eth_blockNumber` payload; everything else passes through unchanged.
pub fn shape_request(method: Method, body: Bytes) -> (Method, Bytes) {
    if method == Method::GET && body.is_empty() {
        (Method::POST, Bytes::from_static(DEFAULT_RPC_BODY.as_bytes()))
    } else {
        (method, body)
    }
}
