//! HTTP client for upstream connections
//!
//! One outbound call per inbound request, never retried. No timeout is set
//! here; the connection lives as long as the inbound request does.

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use reqwest::{redirect, Client, Response};
use url::Url;

use super::headers::{forwards_body, passthrough_request_headers, upstream_request_headers};

/// Error type for upstream client operations
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("Invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Client for the key-discovery upstream and passthrough destinations
#[derive(Clone)]
pub struct UpstreamClient {
    /// Key-discovery calls follow redirects like any fetch would
    key_discovery: Client,
    /// Passthrough relays redirects to the caller untouched
    passthrough: Client,
    max_body_bytes: usize,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(max_body_bytes: usize) -> Result<Self, UpstreamError> {
        let key_discovery = Client::builder().build()?;
        let passthrough = Client::builder().redirect(redirect::Policy::none()).build()?;

        Ok(Self {
            key_discovery,
            passthrough,
            max_body_bytes,
        })
    }

    /// Send a key-discovery request to the upstream service
    ///
    /// Method and headers are taken from the inbound request; the body is
    /// attached only for methods that carry one.
    pub async fn fetch_key(&self, request: Request<Body>, upstream_url: Url) -> Result<Response, UpstreamError> {
        let (parts, body) = request.into_parts();

        let mut builder = self
            .key_discovery
            .request(parts.method.clone(), upstream_url)
            .headers(upstream_request_headers(parts.headers));

        if forwards_body(&parts.method) {
            builder = builder.body(to_bytes(body, self.max_body_bytes).await?);
        }

        Ok(builder.send().await?)
    }

    /// Forward a request unmodified to its original destination
    pub async fn passthrough(&self, request: Request<Body>, target: Url) -> Result<Response, UpstreamError> {
        let (parts, body) = request.into_parts();

        let mut builder = self
            .passthrough
            .request(parts.method.clone(), target)
            .headers(passthrough_request_headers(parts.headers));

        if forwards_body(&parts.method) {
            builder = builder.body(to_bytes(body, self.max_body_bytes).await?);
        }

        Ok(builder.send().await?)
    }
}
