//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read & parse variables)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so only the API key is mandatory
//! - Validation separates syntactic (parsing) from semantic checks
//! - The API key is treated as a secret everywhere downstream:
//!   it never appears in logs or Debug output consumed by logs

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError};
pub use schema::{CorsConfig, ListenerConfig, ProxyConfig, TimeoutConfig, UpstreamConfig};
