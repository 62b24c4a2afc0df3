//! Key-discovery request classification
//!
//! Turns an inbound WKD request into the upstream URL it maps to.

use axum::http::Uri;
use url::{form_urlencoded, Url};
use wkd_router_shared::{
    KeyLookup, WkdError, LOCAL_PART_PARAM, OPENPGPKEY_SEGMENT, OPENPGPKEY_SUBDOMAIN_PREFIX,
    WELL_KNOWN_PATH_PREFIX,
};

/// A recognized key-discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRequest {
    pub lookup: KeyLookup,
    pub upstream_url: Url,
}

impl KeyRequest {
    /// Classify a key-discovery request and build its upstream URL
    ///
    /// `host` is the normalized host the client addressed, before any
    /// loopback substitution.
    pub fn parse(
        host: &str,
        uri: &Uri,
        root_domain: &str,
        upstream_base: &str,
    ) -> Result<Self, WkdError> {
        let key = lookup_key(host, uri.path());
        let local_part = local_part(uri.query());

        let lookup = KeyLookup::new(key, local_part.as_deref())?;
        let upstream_url = lookup.upstream_url(upstream_base, root_domain)?;

        Ok(Self {
            lookup,
            upstream_url,
        })
    }
}

/// Whether a request targets the WKD surface
pub fn is_key_discovery_request(hostname: &str, path: &str) -> bool {
    hostname.starts_with(OPENPGPKEY_SUBDOMAIN_PREFIX) || path.starts_with(WELL_KNOWN_PATH_PREFIX)
}

/// Extract the lookup key from a request path
///
/// On the openpgpkey subdomain only the final segment counts. Otherwise the
/// segments following the `openpgpkey` marker are considered (all of them if
/// the marker is absent) and the last one is the key. Empty when there is
/// nothing to take.
pub fn lookup_key<'a>(host: &str, path: &'a str) -> &'a str {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let segments = if host.starts_with(OPENPGPKEY_SUBDOMAIN_PREFIX) {
        &segments[..]
    } else {
        let start = segments
            .iter()
            .position(|segment| *segment == OPENPGPKEY_SEGMENT)
            .map_or(0, |marker| marker + 1);
        &segments[start..]
    };

    segments.last().copied().unwrap_or_default()
}

/// First value of the `l` query parameter, form-urlencoded decoded
pub fn local_part(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| name == LOCAL_PART_PARAM)
        .map(|(_, value)| value.into_owned())
}
