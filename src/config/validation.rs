//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde/env parsing handles syntactic)
//! - Check the API key and network are safe to embed in a URL
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Error messages never contain the API key itself

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingApiKey,
    InvalidApiKey,
    InvalidNetwork(String),
    InvalidEndpoint(String),
    EmptyOriginEntry,
    ZeroTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingApiKey => write!(f, "upstream API key is not set"),
            ValidationError::InvalidApiKey => {
                write!(f, "upstream API key contains characters unsafe for a URL")
            }
            ValidationError::InvalidNetwork(network) => {
                write!(f, "invalid upstream network {:?}", network)
            }
            ValidationError::InvalidEndpoint(endpoint) => {
                write!(f, "invalid upstream endpoint URL {:?}", endpoint)
            }
            ValidationError::EmptyOriginEntry => {
                write!(f, "CORS allow-list contains an empty origin")
            }
            ValidationError::ZeroTimeout => write!(f, "request timeout must be greater than zero"),
        }
    }
}

/// Validate a loaded configuration, collecting every failure.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.api_key.is_empty() {
        errors.push(ValidationError::MissingApiKey);
    } else if !config.upstream.api_key.chars().all(is_url_safe) {
        errors.push(ValidationError::InvalidApiKey);
    }

    if config.upstream.network.is_empty()
        || !config
            .upstream
            .network
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        errors.push(ValidationError::InvalidNetwork(
            config.upstream.network.clone(),
        ));
    }

    if let Some(endpoint) = &config.upstream.endpoint {
        if url::Url::parse(endpoint).is_err() {
            errors.push(ValidationError::InvalidEndpoint(endpoint.clone()));
        }
    }

    if config.cors.allowed_origins.iter().any(|o| o.is_empty()) {
        errors.push(ValidationError::EmptyOriginEntry);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')
}
