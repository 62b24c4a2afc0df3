//! Header handling for forwarded requests and relayed responses
//!
//! Hop-by-hop headers describe a single connection and are never forwarded
//! (RFC 9110 section 7.6.1). Everything else passes through unchanged.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};

/// `Via` entry this router adds to every passthrough request
pub const VIA_TOKEN: &str = "1.1 wkd-router";

/// Connection-scoped headers dropped in both directions
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any listed in `Connection`
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}

/// Headers for a request to the key-discovery upstream
///
/// The upstream host comes from the URL, and the body length is recomputed
/// by the client.
pub fn upstream_request_headers(mut headers: HeaderMap) -> HeaderMap {
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers
}

/// Headers for a passthrough request
///
/// `Host` is kept so the destination sees the name the client asked for, and
/// a `Via` entry marks the request so it is refused if it comes back here.
pub fn passthrough_request_headers(mut headers: HeaderMap) -> HeaderMap {
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);
    headers.append(header::VIA, HeaderValue::from_static(VIA_TOKEN));
    headers
}

/// Whether a request already went through this router's passthrough
pub fn has_passed_through(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::VIA)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|hop| hop.trim().eq_ignore_ascii_case(VIA_TOKEN))
}

/// Whether a request body is forwarded for this method
pub fn forwards_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("openpgpkey.example.com"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/octet-stream"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace", HeaderValue::from_static("abc"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers.insert("x-custom", HeaderValue::from_static("kept"));
        headers
    }

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = inbound_headers();
        strip_hop_by_hop(&mut headers);

        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("keep-alive").is_none());
        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        // Named in Connection, so connection-scoped too
        assert!(headers.get("x-trace").is_none());

        assert_eq!(headers.get("x-custom").unwrap(), "kept");
        assert_eq!(headers.get(header::ACCEPT).unwrap(), "application/octet-stream");
    }

    #[test]
    fn test_upstream_request_headers_drop_host() {
        let headers = upstream_request_headers(inbound_headers());
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(headers.get("x-custom").unwrap(), "kept");
    }

    #[test]
    fn test_passthrough_request_headers_keep_host() {
        let headers = passthrough_request_headers(inbound_headers());
        assert_eq!(headers.get(header::HOST).unwrap(), "openpgpkey.example.com");
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
        assert!(has_passed_through(&headers));
    }

    #[test]
    fn test_passthrough_via_is_appended_to_existing_hops() {
        let mut inbound = inbound_headers();
        inbound.insert(header::VIA, HeaderValue::from_static("1.1 edge-cache"));

        let headers = passthrough_request_headers(inbound);
        let hops: Vec<_> = headers.get_all(header::VIA).iter().collect();
        assert_eq!(hops, vec!["1.1 edge-cache", VIA_TOKEN]);
    }

    #[test]
    fn test_has_passed_through() {
        assert!(!has_passed_through(&inbound_headers()));
        assert!(!has_passed_through(&upstream_request_headers(inbound_headers())));

        let mut headers = HeaderMap::new();
        headers.insert(header::VIA, HeaderValue::from_static("1.0 fred, 1.1 WKD-Router"));
        assert!(has_passed_through(&headers));

        headers.insert(header::VIA, HeaderValue::from_static("1.1 wkd-router-staging"));
        assert!(!has_passed_through(&headers));
    }

    #[test]
    fn test_forwards_body() {
        assert!(!forwards_body(&Method::GET));
        assert!(!forwards_body(&Method::HEAD));
        assert!(forwards_body(&Method::POST));
        assert!(forwards_body(&Method::PUT));
        assert!(forwards_body(&Method::PATCH));
        assert!(forwards_body(&Method::DELETE));
        assert!(forwards_body(&Method::OPTIONS));
    }
}
