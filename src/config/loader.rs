//! Configuration loading from the environment.

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the comma-separated CORS allow-list.
pub const ENV_CORS_ALLOW_ORIGIN: &str = "CORS_ALLOW_ORIGIN";
/// Environment variable holding the upstream API key.
pub const ENV_API_KEY: &str = "ALCHEMY_API_KEY";
/// Environment variable selecting the upstream network subdomain.
pub const ENV_NETWORK: &str = "ALCHEMY_NETWORK";
/// Environment variable supplying an explicit upstream base URL,
/// overriding network-based routing.
pub const ENV_ENDPOINT: &str = "ALCHEMY_RPC_URL";
/// Environment variable overriding the listener bind address.
pub const ENV_BIND_ADDRESS: &str = "PROXY_BIND_ADDRESS";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PROXY_REQUEST_TIMEOUT_SECS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    Parse { name: &'static str, value: String },
    /// Semantic validation failed after loading.
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse { name, value } => {
                write!(f, "failed to parse {}: {:?}", name, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig::default();

    if let Ok(origins) = std::env::var(ENV_CORS_ALLOW_ORIGIN) {
        config.cors.allowed_origins = split_origins(&origins);
    }

    if let Ok(key) = std::env::var(ENV_API_KEY) {
        config.upstream.api_key = key;
    }

    if let Ok(network) = std::env::var(ENV_NETWORK) {
        if !network.is_empty() {
            config.upstream.network = network;
        }
    }

    if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
        if !endpoint.is_empty() {
            config.upstream.endpoint = Some(endpoint);
        }
    }

    if let Ok(addr) = std::env::var(ENV_BIND_ADDRESS) {
        if !addr.is_empty() {
            config.listener.bind_address = addr;
        }
    }

    if let Ok(secs) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
        config.timeouts.request_secs = secs.parse().map_err(|_| ConfigError::Parse {
            name: ENV_REQUEST_TIMEOUT_SECS,
            value: secs,
        })?;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Split a comma-separated origin list, trimming whitespace and
/// dropping empty entries. An empty input yields an empty allow-list,
/// which means allow-all.
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_origins_trims_and_drops_empty() {
        let origins = split_origins("https://a.example, https://b.example ,,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn split_origins_empty_input_is_allow_all() {
        assert!(split_origins("").is_empty());
    }
}
