//! Request/response logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use super::request_path;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware to log HTTP requests and responses.
/// Note: This middleware does NOT create its own tracing span since `TraceLayer`
/// from tower-http already handles span creation.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = request_path(&request);
    let request_id = extract_request_id(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    info!(
        method = %method,
        path = %path,
        uri = %uri,
        request_id = %request_id,
        user_agent = %user_agent,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            request_id = %request_id,
            "Request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_request_id_from_header() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_request_id(&request), "abc-123");
    }

    #[test]
    fn test_extract_request_id_generates_uuid() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "")
            .body(Body::empty())
            .unwrap();

        let id = extract_request_id(&request);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
