//! Request context middleware.

use axum::{
    body::Body,
    extract::{ConnectInfo, OriginalUri},
    http::{header::HOST, Request},
    middleware::Next,
    response::Response,
};
use calllog_core::{CallLogError, CallLogResult, RequestContextAccessor, RequestInfo};
use std::net::SocketAddr;

/// Caller address logged when the connection info is unavailable.
pub const UNKNOWN_CALLER: &str = "unknown";

tokio::task_local! {
    static CURRENT_REQUEST: RequestInfo;
}

/// Middleware that makes the request visible to the interceptor.
///
/// The request is bound to the task for the duration of `next.run`, so any
/// handler dispatched below this layer can read it.
pub async fn request_context_middleware(request: Request<Body>, next: Next) -> Response {
    let info = request_info(&request);
    CURRENT_REQUEST.scope(info, next.run(request)).await
}

/// Runs `f` with `info` bound as the current request.
pub async fn with_request<F: std::future::Future>(info: RequestInfo, f: F) -> F::Output {
    CURRENT_REQUEST.scope(info, f).await
}

/// Reads the request bound by [`request_context_middleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalRequestContext;

impl RequestContextAccessor for TaskLocalRequestContext {
    fn current_request(&self) -> CallLogResult<RequestInfo> {
        CURRENT_REQUEST
            .try_with(RequestInfo::clone)
            .map_err(|_| CallLogError::MissingRequestContext)
    }
}

/// Captures URL, method and caller address from the request.
///
/// The URL is scheme, host and path; the query string is left out.
#[must_use]
pub fn request_info(request: &Request<Body>) -> RequestInfo {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri(), |original| &original.0);

    let host = uri.authority().map(ToString::to_string).or_else(|| {
        request
            .headers()
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .map(ToString::to_string)
    });

    let url = match host {
        Some(host) => format!("{}://{}{}", uri.scheme_str().unwrap_or("http"), host, uri.path()),
        None => uri.path().to_string(),
    };

    let caller_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_CALLER.to_string(), |info| info.0.ip().to_string());

    RequestInfo::new(url, request.method().as_str(), caller_address)
}
