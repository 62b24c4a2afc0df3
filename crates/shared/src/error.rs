//! Error types for WKD lookups

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WkdError {
    #[error("Missing local part in query parameter 'l'")]
    MissingLocalPart,

    #[error("Invalid upstream URL: {0}")]
    InvalidUpstreamUrl(#[from] url::ParseError),
}
