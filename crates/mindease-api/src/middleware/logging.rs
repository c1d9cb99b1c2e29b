use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::identity::USER_ID_HEADER;

/// How the response body is delivered
fn body_kind(headers: &HeaderMap) -> &'static str {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("text/event-stream") {
        "sse"
    } else if content_type.starts_with("application/json") {
        "json"
    } else if content_type.starts_with("text/plain") {
        "text"
    } else {
        "other"
    }
}

/// One line per request.
///
/// `duration_ms` covers the time to the response head only; an SSE reply
/// keeps streaming after this line is written. The caller is logged as
/// `user` or `anonymous`, never by uid.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let scope = if req.headers().contains_key(USER_ID_HEADER) {
        "user"
    } else {
        "anonymous"
    };
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let body = body_kind(response.headers());
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::warn!(%method, %path, %status, scope, body, duration_ms, "Request failed");
    } else {
        tracing::info!(%method, %path, %status, scope, body, duration_ms, "Request processed");
    }

    response
}
