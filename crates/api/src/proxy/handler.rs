//! WKD router request handler
//!
//! Every inbound request goes through [`route_request`]:
//!
//! 1. Resolve the host to a configured root domain (or fail closed)
//! 2. Key-discovery requests are rewritten to the upstream service
//! 3. Anything else is passed through to its original destination

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, Uri},
    response::Response,
};
use tracing::{debug, error, info, warn};
use url::Url;
use wkd_router_shared::WkdError;

use super::headers::{has_passed_through, strip_hop_by_hop};
use super::UpstreamError;
use crate::error::{ApiError, ApiResult};
use crate::routing::{
    is_key_discovery_request, normalize_host, request_host, HostResolveError, KeyRequest,
};
use crate::state::AppState;

/// Header naming the scheme the client used in front of a TLS-terminating edge
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Route a single inbound request
pub async fn route_request(
    State(state): State<AppState>,
    request: Request<Body>,
) -> ApiResult<Response> {
    let host = normalize_host(request_host(request.uri(), request.headers()));

    let resolved = match state.resolver.resolve(&host) {
        Ok(resolved) => resolved,
        Err(HostResolveError::NoDomainsConfigured) => {
            error!(
                event = "missing_domains",
                "DOMAINS environment variable is empty or missing"
            );
            return Err(ApiError::Configuration);
        }
        Err(HostResolveError::NotSupported(hostname)) => {
            info!(event = "unsupported_domain", hostname = %hostname, "Domain not supported");
            return Err(ApiError::DomainNotSupported);
        }
    };

    if is_key_discovery_request(&resolved.hostname, request.uri().path()) {
        return forward_key_request(&state, request, &host, &resolved.root_domain).await;
    }

    // Our own passthrough came back to us: the destination resolves to this router
    if has_passed_through(request.headers()) {
        error!(
            event = "passthrough_loop",
            host = %host,
            path = %request.uri().path(),
            "Passthrough request looped back into the router"
        );
        return Err(ApiError::Internal);
    }

    passthrough(&state, request).await
}

/// Rewrite a key-discovery request to the upstream service and relay the answer
async fn forward_key_request(
    state: &AppState,
    request: Request<Body>,
    host: &str,
    root_domain: &str,
) -> ApiResult<Response> {
    let key_request = match KeyRequest::parse(
        host,
        request.uri(),
        root_domain,
        &state.config.upstream_base,
    ) {
        Ok(key_request) => key_request,
        Err(WkdError::MissingLocalPart) => {
            warn!(
                event = "missing_local_part",
                domain = %root_domain,
                path = %request.uri().path(),
                "Key lookup without local part"
            );
            return Err(ApiError::MissingLocalPart);
        }
        Err(e) => return Err(e.into()),
    };

    let upstream_url = key_request.upstream_url;
    info!(
        event = "upstream_fetch",
        url = %upstream_url,
        method = %request.method(),
        "Fetching from key-discovery upstream"
    );

    let response = state
        .upstream
        .fetch_key(request, upstream_url.clone())
        .await?;

    let status = response.status();
    if !is_ok_status(status) {
        let body = response.text().await.map_err(UpstreamError::from)?;
        warn!(
            event = "upstream_error",
            status = status.as_u16(),
            body = %body,
            url = %upstream_url,
            "Key-discovery upstream returned an error"
        );
        return Err(ApiError::UpstreamStatus(status));
    }

    Ok(relay(response))
}

/// Forward a request unmodified to its original destination
async fn passthrough(state: &AppState, request: Request<Body>) -> ApiResult<Response> {
    let target = passthrough_url(
        state.config.passthrough_origin.as_ref(),
        request.uri(),
        request.headers(),
    )
    .map_err(UpstreamError::from)?;

    debug!(
        event = "passthrough",
        url = %target,
        method = %request.method(),
        "Passing request through"
    );

    let response = state.upstream.passthrough(request, target).await?;
    Ok(relay(response))
}

/// Upstream statuses relayed verbatim
fn is_ok_status(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// Where a passthrough request is sent
///
/// With a configured origin, the request path and query are resolved against
/// it. Otherwise the request goes back to the host the client addressed,
/// over the scheme the edge saw (`https` unless told otherwise).
fn passthrough_url(
    origin: Option<&Url>,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Url, url::ParseError> {
    if let Some(origin) = origin {
        // Set path and query explicitly; joining would honor "//host" paths
        let mut url = origin.clone();
        url.set_path(uri.path());
        url.set_query(uri.query());
        return Ok(url);
    }

    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    let scheme = match headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_lowercase())
    {
        Some(proto) if proto == "http" => "http",
        _ => "https",
    };

    Url::parse(&format!(
        "{scheme}://{}{path_and_query}",
        request_host(uri, headers)
    ))
}

/// Turn an upstream response into the caller's response, body streamed
fn relay(response: reqwest::Response) -> Response {
    let status = response.status();
    let mut headers = response.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut relayed = Response::new(Body::from_stream(response.bytes_stream()));
    *relayed.status_mut() = status;
    *relayed.headers_mut() = headers;
    relayed
}
