//! Host-based routing for the WKD router
//!
//! This module decides what an incoming request is:
//! - Which configured root domain its host belongs to (`host_resolver`)
//! - Whether it is a key-discovery request, and for which lookup (`key_request`)
//!
//! Both WKD methods are recognized:
//! - Advanced: openpgpkey.example.com/hu/<hash>?l=<local>
//! - Direct: example.com/.well-known/openpgpkey/hu/<hash>?l=<local>

mod host_resolver;
mod key_request;

pub use host_resolver::{
    normalize_host, request_host, HostResolveError, HostResolver, ResolvedHost, LOOPBACK_HOST,
};
pub use key_request::{is_key_discovery_request, local_part, lookup_key, KeyRequest};
