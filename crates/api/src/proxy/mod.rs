//! Request forwarding
//!
//! Forwards key-discovery requests to the upstream key-discovery service and
//! everything else on a configured domain to its original destination.
//!
//! # Architecture
//!
//! ```text
//! Client --> WKD Router --> api.protonmail.ch   (openpgpkey.<d>/..., <d>/.well-known/openpgpkey/...)
//!                       --> original host       (any other request on <d>)
//! ```

pub mod client;
pub mod handler;
pub mod headers;

pub use client::{UpstreamClient, UpstreamError};
pub use handler::route_request;
