//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → cors.rs (origin matching, header set computation)
//!     → secrets.rs (key-in-path rejection)
//!     → [forwarding]
//! Upstream response
//!     → secrets.rs (key redaction)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - The API key is the only secret in the system; everything here
//!   exists to keep it out of URLs, responses, and logs
//! - CORS is evaluated once per request and the header set reused for
//!   success and error responses alike

pub mod cors;
pub mod secrets;
