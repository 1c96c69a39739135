//! Error types and the JSON-RPC error envelope.
//!
//! Every failure on the forwarding path collapses into a fixed JSON-RPC
//! error envelope. Internal detail (upstream error text, IO errors) is
//! logged but never sent to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON-RPC error code for requests rejected before contacting upstream.
pub const CODE_INVALID_REQUEST: i64 = -32000;
/// JSON-RPC error code for internal proxy failures.
pub const CODE_PROXY_ERROR: i64 = -92500;

/// Message returned for rejected requests (e.g., key embedded in the path).
pub const MSG_INVALID_REQUEST: &str = "Invalid request";
/// Message returned for any internal failure. Deliberately generic.
pub const MSG_PROXY_ERROR: &str = "Internal RPC proxy error";

/// Failures on the forwarding path. All variants map to the same
/// client-facing envelope; the distinction exists for logging.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to read request body: {0}")]
    BodyRead(#[from] axum::Error),

    #[error("upstream call failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to assemble response: {0}")]
    Response(#[from] axum::http::Error),
}

/// Fixed JSON-RPC 2.0 error envelope: `{jsonrpc, error: {code, message}, id: null}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    pub jsonrpc: String,
    pub error: ErrorObject,
    pub id: Option<serde_json::Value>,
}

/// The `error` member of the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

impl ErrorEnvelope {
    /// Build an envelope with `id: null` as required by the wire shape.
    pub fn new(code: i64, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            error: ErrorObject {
                code,
                message: message.to_string(),
            },
            id: None,
        }
    }

    /// The envelope for requests rejected before contacting upstream.
    pub fn invalid_request() -> Self {
        Self::new(CODE_INVALID_REQUEST, MSG_INVALID_REQUEST)
    }

    /// The envelope for any internal failure.
    pub fn proxy_error() -> Self {
        Self::new(CODE_PROXY_ERROR, MSG_PROXY_ERROR)
    }
}
