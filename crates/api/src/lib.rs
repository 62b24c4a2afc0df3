//! WKD Router API Library
//!
//! This crate contains the HTTP server components of the WKD router: host
//! resolution, key-discovery rewriting and passthrough forwarding.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod routing;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use routing::{HostResolver, KeyRequest, ResolvedHost};
pub use state::AppState;
