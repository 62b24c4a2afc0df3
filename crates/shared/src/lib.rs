//! WKD Router Shared Types and Utilities
//!
//! This crate contains the Web Key Directory vocabulary shared by the router:
//! the configured domain set, lookup classification and upstream URL building.

pub mod error;
pub mod types;
pub mod wkd;

pub use error::*;
pub use types::*;
pub use wkd::*;
