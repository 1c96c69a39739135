//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits so the same structs can be used by tests
//! and tooling; the process itself populates them from the environment.

use serde::{Deserialize, Serialize};

/// Root configuration for the RPC proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// CORS policy settings.
    pub cors: CorsConfig,

    /// Upstream provider settings (API key, network).
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// CORS policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to read responses (exact match).
    /// Empty list means every origin is allowed (`*`).
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// True when no allow-list is configured and any origin is acceptable.
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider API key, embedded into the upstream URL.
    /// Must never appear in responses, error messages, or logs.
    pub api_key: String,

    /// Network subdomain selecting the upstream host
    /// (e.g., "eth-mainnet", "eth-sepolia").
    pub network: String,

    /// Explicit upstream base URL; the API key is appended as the final
    /// path segment. Overrides network-based routing, for providers
    /// without subdomain routing and for tests.
    pub endpoint: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            network: "eth-mainnet".to_string(),
            endpoint: None,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}
