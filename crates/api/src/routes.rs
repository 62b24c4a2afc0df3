//! API routes

use std::any::Any;

use axum::{response::IntoResponse, response::Response, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{error::ApiError, proxy::route_request, state::AppState};

/// Create the router
///
/// There are no fixed routes: every method and path on a configured domain
/// is either a key-discovery request or passthrough traffic.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(route_request)
        // A panicking handler still answers with the generic 500
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(event = "unhandled_error", message = %message, "Request handler panicked");
    ApiError::Internal.into_response()
}
