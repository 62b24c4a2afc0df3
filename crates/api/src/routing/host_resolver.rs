//! Host-to-Root-Domain Resolution
//!
//! Resolves incoming hosts to one of the configured root domains.
//! Supports:
//! - Exact matches: example.com -> example.com
//! - Subdomains: openpgpkey.example.com -> example.com
//! - Loopback: localhost -> first configured domain (local development)

use std::sync::Arc;

use axum::http::{header, HeaderMap, Uri};
use wkd_router_shared::DomainSet;

/// Hostname replaced by the default domain before resolution
pub const LOOPBACK_HOST: &str = "localhost";

/// Result of resolving a host to a root domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost {
    /// The hostname used for routing (after loopback substitution)
    pub hostname: String,
    /// The configured root domain that matched
    pub root_domain: String,
}

/// Resolver over the configured domain set
#[derive(Debug, Clone)]
pub struct HostResolver {
    domains: Arc<DomainSet>,
}

impl HostResolver {
    /// Create a new host resolver
    pub fn new(domains: DomainSet) -> Self {
        Self {
            domains: Arc::new(domains),
        }
    }

    /// Resolve a host to its root domain
    ///
    /// Returns:
    /// - Ok(ResolvedHost) if the host is a configured domain or a subdomain of one
    /// - Err(NoDomainsConfigured) if nothing is configured, regardless of host
    /// - Err(NotSupported) if no configured domain matches
    pub fn resolve(&self, host: &str) -> Result<ResolvedHost, HostResolveError> {
        let default_domain = self
            .domains
            .default_domain()
            .ok_or(HostResolveError::NoDomainsConfigured)?;

        let host = normalize_host(host);
        let hostname = if host == LOOPBACK_HOST {
            default_domain.to_string()
        } else {
            host
        };

        match self.domains.find_root(&hostname) {
            Some(root_domain) => Ok(ResolvedHost {
                root_domain: root_domain.to_string(),
                hostname,
            }),
            None => Err(HostResolveError::NotSupported(hostname)),
        }
    }
}

/// Normalize a host header value
pub fn normalize_host(host: &str) -> String {
    // Bracketed IPv6 literal, keep the brackets and drop the port
    if let Some(end) = host.strip_prefix('[').and_then(|rest| rest.find(']')) {
        return host[..end + 2].to_lowercase();
    }
    // Remove port if present
    let host = host.split(':').next().unwrap_or(host);
    // Lowercase
    host.to_lowercase()
}

/// Host the client addressed
///
/// HTTP/2 carries it in the URI authority, HTTP/1.1 in the Host header.
pub fn request_host<'a>(uri: &'a Uri, headers: &'a HeaderMap) -> &'a str {
    uri.authority()
        .map(|authority| authority.as_str())
        .or_else(|| {
            headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
        })
        .unwrap_or_default()
}

/// Errors that can occur during host resolution
#[derive(Debug, thiserror::Error)]
pub enum HostResolveError {
    #[error("No domains configured")]
    NoDomainsConfigured,

    #[error("Host not supported: {0}")]
    NotSupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn resolver() -> HostResolver {
        HostResolver::new(DomainSet::parse("example.com,example.org,example.net"))
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Example.COM"), "example.com");
        assert_eq!(normalize_host("example.com:8080"), "example.com");
        assert_eq!(normalize_host("OPENPGPKEY.EXAMPLE.COM:443"), "openpgpkey.example.com");
        assert_eq!(normalize_host("[::1]:8787"), "[::1]");
        assert_eq!(normalize_host(""), "");
    }

    #[test]
    fn test_resolve_exact_and_subdomain() {
        let resolver = resolver();

        let resolved = resolver.resolve("example.org").unwrap();
        assert_eq!(resolved.root_domain, "example.org");
        assert_eq!(resolved.hostname, "example.org");

        let resolved = resolver.resolve("openpgpkey.example.net:443").unwrap();
        assert_eq!(resolved.root_domain, "example.net");
        assert_eq!(resolved.hostname, "openpgpkey.example.net");
    }

    #[test]
    fn test_resolve_localhost_uses_default_domain() {
        let resolved = resolver().resolve("localhost:8787").unwrap();
        assert_eq!(resolved.hostname, "example.com");
        assert_eq!(resolved.root_domain, "example.com");
    }

    #[test]
    fn test_resolve_unsupported() {
        match resolver().resolve("unknown.example") {
            Err(HostResolveError::NotSupported(host)) => assert_eq!(host, "unknown.example"),
            other => panic!("Expected NotSupported, got: {:?}", other),
        }
        assert!(matches!(
            resolver().resolve("notexample.com"),
            Err(HostResolveError::NotSupported(_))
        ));
    }

    #[test]
    fn test_resolve_without_domains_fails_for_every_host() {
        let resolver = HostResolver::new(DomainSet::parse(" , "));
        for host in ["example.com", "localhost", ""] {
            assert!(matches!(
                resolver.resolve(host),
                Err(HostResolveError::NoDomainsConfigured)
            ));
        }
    }

    #[test]
    fn test_request_host_prefers_authority() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.org"));

        let uri: Uri = "https://openpgpkey.example.com/hu/abc".parse().unwrap();
        assert_eq!(request_host(&uri, &headers), "openpgpkey.example.com");

        let uri: Uri = "/hu/abc".parse().unwrap();
        assert_eq!(request_host(&uri, &headers), "example.org");

        assert_eq!(request_host(&uri, &HeaderMap::new()), "");
    }
}
