//! Request ID propagation.
//!
//! Every request gets an id that shows up in log spans, Sentry events, and
//! the response headers, so a customer-reported failure can be matched to
//! server-side traces.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Incoming ids longer than this are replaced rather than trusted.
const MAX_INCOMING_ID_LEN: usize = 64;

/// Reuse the proxy-assigned id when present and sane, otherwise mint one.
fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_INCOMING_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that tags the request with an id and echoes it back.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_incoming_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(resolve_request_id(&headers), "abc-123");
    }

    #[test]
    fn generates_when_missing() {
        let headers = HeaderMap::new();
        let id = resolve_request_id(&headers);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn rejects_oversized_ids() {
        let mut headers = HeaderMap::new();
        let long = "x".repeat(65);
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(&long).expect("header"),
        );
        let id = resolve_request_id(&headers);
        assert_ne!(id, long);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
