//! Request id and request metrics middleware.

use crate::observability::{REQUEST_ID_HEADER, RequestContext, scope_request_context};
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::Instrument;

/// Assigns or propagates `x-request-id` and scopes it over the handler.
///
/// The id is echoed on the response, attached to an `http_request` span, and
/// available to blocking store calls through [`RequestContext::current`].
pub async fn request_context(request: Request, next: Next) -> Response {
    let context = RequestContext::from_header(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let request_id = context.request_id().to_string();
    let method = request.method().to_string();
    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
    );

    let start = Instant::now();
    let mut response = scope_request_context(context, next.run(request))
        .instrument(span)
        .await;

    let status = response.status();
    metrics::counter!(
        "todo_http_requests_total",
        "method" => method,
        "status" => status.as_str().to_string()
    )
    .increment(1);
    metrics::histogram!("todo_http_request_duration_ms")
        .record(start.elapsed().as_secs_f64() * 1000.0);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
