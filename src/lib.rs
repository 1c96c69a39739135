//! Key-injecting JSON-RPC reverse proxy library.
//!
//! Forwards JSON-RPC (and WebSocket) traffic to a single upstream node
//! provider, embedding the API key server-side, attaching CORS headers,
//! and scrubbing the key from anything sent back to the client.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod security;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
