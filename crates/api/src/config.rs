//! Application configuration

use std::env;
use std::net::SocketAddr;

use url::Url;
use wkd_router_shared::{DomainSet, UPSTREAM_BASE_URL};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: SocketAddr,
    pub max_request_body_bytes: usize,

    // Routing
    pub domains: DomainSet, // e.g. "example.com,example.org"; first entry is the default
    pub passthrough_origin: Option<Url>,

    // Upstream key discovery (fixed, not read from the environment)
    pub upstream_base: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8787".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("BIND_ADDRESS", "expected host:port"))?,
            max_request_body_bytes: env::var("MAX_REQUEST_BODY_BYTES")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB default
                .parse()
                .map_err(|_| ConfigError::Invalid("MAX_REQUEST_BODY_BYTES", "expected a byte count"))?,

            // Routing
            // An empty list is not a startup error: every request fails closed instead
            domains: DomainSet::parse(&env::var("DOMAINS").unwrap_or_default()),
            passthrough_origin: match env::var("PASSTHROUGH_ORIGIN") {
                Ok(origin) if !origin.trim().is_empty() => Some(parse_origin(origin.trim())?),
                _ => None,
            },

            upstream_base: UPSTREAM_BASE_URL.to_string(),
        })
    }

    /// Configuration for a fixed domain list, with every other setting at its default
    pub fn with_domains(domains: &str) -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8787)),
            max_request_body_bytes: 10 * 1024 * 1024,
            domains: DomainSet::parse(domains),
            passthrough_origin: None,
            upstream_base: UPSTREAM_BASE_URL.to_string(),
        }
    }
}

/// Validate a passthrough origin: absolute http(s) URL with a host
fn parse_origin(origin: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(origin)
        .map_err(|_| ConfigError::Invalid("PASSTHROUGH_ORIGIN", "expected an absolute URL"))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Invalid(
            "PASSTHROUGH_ORIGIN",
            "expected an http(s) origin with a host",
        ));
    }

    Ok(url)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to clear env vars after tests
    fn cleanup_config() {
        env::remove_var("DOMAINS");
        env::remove_var("BIND_ADDRESS");
        env::remove_var("PASSTHROUGH_ORIGIN");
        env::remove_var("MAX_REQUEST_BODY_BYTES");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        cleanup_config();

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:8787");
        assert_eq!(config.max_request_body_bytes, 10_485_760);
        assert!(config.domains.is_empty(), "Missing DOMAINS must not fail startup");
        assert!(config.passthrough_origin.is_none());
        assert_eq!(config.upstream_base, "https://api.protonmail.ch");
    }

    #[test]
    #[serial]
    fn test_domains_are_parsed() {
        cleanup_config();
        env::set_var("DOMAINS", "example.com, example.org ,,example.net");

        let config = Config::from_env().unwrap();
        assert_eq!(config.domains.len(), 3);
        assert_eq!(config.domains.default_domain(), Some("example.com"));

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_passthrough_origin_validation() {
        cleanup_config();

        // === Valid origin ===
        env::set_var("PASSTHROUGH_ORIGIN", "http://127.0.0.1:8080");
        let config = Config::from_env().unwrap();
        assert_eq!(
            config.passthrough_origin.map(|u| u.to_string()),
            Some("http://127.0.0.1:8080/".to_string())
        );

        // === Blank origin is treated as unset ===
        env::set_var("PASSTHROUGH_ORIGIN", "   ");
        assert!(Config::from_env().unwrap().passthrough_origin.is_none());

        // === Relative value rejected ===
        env::set_var("PASSTHROUGH_ORIGIN", "origin.internal");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("PASSTHROUGH_ORIGIN", _))
        ));

        // === Non-http scheme rejected ===
        env::set_var("PASSTHROUGH_ORIGIN", "ftp://origin.internal");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("PASSTHROUGH_ORIGIN", _))
        ));

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_rejected() {
        cleanup_config();

        env::set_var("BIND_ADDRESS", "not-an-address");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("BIND_ADDRESS", _))
        ));
        env::remove_var("BIND_ADDRESS");

        env::set_var("MAX_REQUEST_BODY_BYTES", "lots");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("MAX_REQUEST_BODY_BYTES", _))
        ));

        cleanup_config();
    }
}
