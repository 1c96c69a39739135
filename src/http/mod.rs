//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, preflight, key-in-path guard)
//!     → request.rs (request ID)
//!     → websocket.rs (upgrade relay)  |  upstream (forwarded RPC call)
//!     → Send to client (key-redacted, CORS headers attached)
//! ```

pub mod request;
pub mod server;
pub mod websocket;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
