//! Shared application state

use std::sync::Arc;

use crate::config::Config;
use crate::proxy::{UpstreamClient, UpstreamError};
use crate::routing::HostResolver;

/// State handed to every request; read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: HostResolver,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(config.max_request_body_bytes)?;
        let resolver = HostResolver::new(config.domains.clone());

        Ok(Self {
            config: Arc::new(config),
            resolver,
            upstream,
        })
    }
}
